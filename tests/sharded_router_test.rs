use ride_lifecycle::domain::clock::SystemClock;
use ride_lifecycle::domain::code_vault::CodeVault;
use ride_lifecycle::domain::verification::{CodePurpose, RandomCodeGenerator};
use ride_lifecycle::infrastructure::code_store::ShardedCodeStore;
use std::sync::Arc;
use std::thread;

fn shared_vault(shards: usize) -> Arc<CodeVault> {
    Arc::new(
        CodeVault::new(
            Box::new(ShardedCodeStore::new(shards)),
            Arc::new(SystemClock),
        )
        .with_generator(Box::new(RandomCodeGenerator::seeded(3))),
    )
}

#[test]
fn test_distinct_subjects_in_parallel() {
    let vault = shared_vault(16);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let vault = vault.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let subject = format!("rider{}-{}@example.com", t, i);
                    let code = vault.issue(&subject, CodePurpose::Verification);
                    assert!(vault.verify(&subject, code.as_str(), CodePurpose::Verification));
                    vault.invalidate(&subject);
                    assert!(!vault.verify(&subject, code.as_str(), CodePurpose::Verification));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(vault.live_records(), 0);
}

#[test]
fn test_same_subject_never_sees_partial_record() {
    let vault = shared_vault(1);
    let subject = "contended@example.com";

    // Issuers keep overwriting one subject while readers probe it.
    let issuers: Vec<_> = (0..4)
        .map(|_| {
            let vault = vault.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    vault.issue(subject, CodePurpose::PasswordReset);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let vault = vault.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    // Wrong purpose must never pass, whatever the interleaving.
                    assert!(!vault.verify(subject, "000000", CodePurpose::Verification));
                }
            })
        })
        .collect();

    for handle in issuers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(vault.live_records(), 1);
}
