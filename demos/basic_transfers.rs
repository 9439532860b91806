//! Basic ledger usage example

use ledger_core::utils::MemoryStore;
use ledger_core::{Ledger, TransferRequest, ROOT_ACCOUNT_NUMBER};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Ledger Core - Basic Transfers Example\n");

    let store = MemoryStore::new();
    let ledger = Ledger::new(store.clone());

    // 1. Register users and open accounts
    println!("👤 Registering users...");
    let ama = ledger.register_user("ama@example.com").await?;
    let kofi = ledger.register_user("kofi@example.com").await?;

    let ama_account = ledger.open_account(ama.id).await?;
    let kofi_account = ledger.open_account(kofi.id).await?;
    println!("  ✓ Ama's account:  {}", ama_account.account_number);
    println!("  ✓ Kofi's account: {}\n", kofi_account.account_number);

    // 2. Deposit money from the outside world
    println!("💰 Depositing 1000 into Ama's account from the root account...");
    let deposit = ledger
        .create_transaction(TransferRequest {
            reference: "dep-0001".to_string(),
            sender: ROOT_ACCOUNT_NUMBER.to_string(),
            recipient: ama_account.account_number.clone(),
            amount: 1000,
        })
        .await?;
    println!("  ✓ Committed transaction {} with {} lines\n", deposit.id, deposit.lines.len());

    // 3. Peer transfer
    println!("💸 Transferring 400 from Ama to Kofi...");
    ledger
        .create_transaction(TransferRequest {
            reference: "pay-0001".to_string(),
            sender: ama_account.account_number.clone(),
            recipient: kofi_account.account_number.clone(),
            amount: 400,
        })
        .await?;

    println!("  Ama:  {}", ledger.balance(ama_account.id).await?);
    println!("  Kofi: {}", ledger.balance(kofi_account.id).await?);
    println!("  Root: {}\n", ledger.balance(store.root_account_id()).await?);

    // 4. Overdraft attempt is rejected atomically
    println!("🚫 Attempting to transfer 700 from Ama (balance 600)...");
    match ledger
        .create_transaction(TransferRequest {
            reference: "pay-0002".to_string(),
            sender: ama_account.account_number.clone(),
            recipient: kofi_account.account_number.clone(),
            amount: 700,
        })
        .await
    {
        Err(err) => println!("  ✓ Rejected: {err}\n"),
        Ok(_) => unreachable!("overdraft must not commit"),
    }

    // 5. Transaction history, newest first
    println!("📜 Ama's history:");
    for tx in ledger.account_transactions(ama_account.id).await? {
        println!("  {} ({} lines)", tx.reference, tx.lines.len());
    }

    Ok(())
}
