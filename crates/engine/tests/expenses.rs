use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Debt, Draft, DraftSplit, Engine, EngineError, ExpenseStatus, MoneyCents, NewMemberCmd,
    SplitStatus, SubmitExpenseCmd,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

struct Flat {
    asha: Uuid,
    ravi: Uuid,
    meera: Uuid,
    tara: Uuid,
    guest: Uuid,
}

/// Asha pays; Tara is Ravi's kid; the guest has no guardian.
async fn flat(engine: &Engine) -> Flat {
    let asha = engine
        .add_member(NewMemberCmd::new("Asha").admin(true))
        .await
        .unwrap();
    let ravi = engine.add_member(NewMemberCmd::new("Ravi")).await.unwrap();
    let meera = engine.add_member(NewMemberCmd::new("Meera")).await.unwrap();
    let tara = engine
        .add_member(NewMemberCmd::proxy("Tara", Some(ravi)))
        .await
        .unwrap();
    let guest = engine
        .add_member(NewMemberCmd::proxy("Guest", None))
        .await
        .unwrap();
    Flat {
        asha,
        ravi,
        meera,
        tara,
        guest,
    }
}

#[tokio::test]
async fn submit_commits_expense_with_exact_splits() {
    let (engine, _db) = engine_with_db().await;
    let f = flat(&engine).await;
    let directory = engine.directory().await.unwrap();

    let mut draft = Draft::for_payer(f.asha, &directory).unwrap();
    draft.select(f.ravi, &directory).unwrap();
    draft.select(f.meera, &directory).unwrap();
    let total: MoneyCents = "10.00".parse().unwrap();
    draft.redistribute(total);

    let expense_id = engine
        .submit(SubmitExpenseCmd::from_draft("Groceries", total, draft))
        .await
        .unwrap();

    let expense = engine.expense(expense_id).await.unwrap();
    assert_eq!(expense.description, "Groceries");
    assert_eq!(expense.payer_id, f.asha);
    assert_eq!(expense.total, MoneyCents::new(10_00));
    assert_eq!(expense.status, ExpenseStatus::Pending);

    let shares: Vec<_> = expense
        .splits
        .iter()
        .map(|s| (s.consumer_id, s.responsible_id, s.amount.to_string()))
        .collect();
    assert_eq!(
        shares,
        vec![
            (f.asha, f.asha, "3.34".to_string()),
            (f.ravi, f.ravi, "3.33".to_string()),
            (f.meera, f.meera, "3.33".to_string()),
        ]
    );
    assert!(expense.splits.iter().all(|s| s.status == SplitStatus::Pending));
    assert!(expense.splits.iter().all(|s| s.expense_id == expense_id));
}

#[tokio::test]
async fn proxy_shares_are_owed_by_guardian_or_payer() {
    let (engine, _db) = engine_with_db().await;
    let f = flat(&engine).await;
    let directory = engine.directory().await.unwrap();

    let mut draft = Draft::for_payer(f.asha, &directory).unwrap();
    draft.select(f.tara, &directory).unwrap();
    draft.select(f.guest, &directory).unwrap();
    draft.redistribute(MoneyCents::new(9_00));

    let expense_id = engine
        .submit(SubmitExpenseCmd::from_draft(
            "Pizza",
            MoneyCents::new(9_00),
            draft,
        ))
        .await
        .unwrap();

    let expense = engine.expense(expense_id).await.unwrap();
    let responsible: Vec<_> = expense.splits.iter().map(|s| s.responsible_id).collect();
    assert_eq!(responsible, vec![f.asha, f.ravi, f.asha]);

    // Asha's own share and the guest's share stay with Asha.
    assert_eq!(
        engine.outstanding_debts().await.unwrap(),
        vec![Debt {
            debtor_id: f.ravi,
            creditor_id: f.asha,
            amount: MoneyCents::new(3_00),
        }]
    );
}

#[tokio::test]
async fn overridden_responsible_party_is_persisted() {
    let (engine, _db) = engine_with_db().await;
    let f = flat(&engine).await;
    let directory = engine.directory().await.unwrap();

    let mut draft = Draft::for_payer(f.asha, &directory).unwrap();
    draft.select(f.guest, &directory).unwrap();
    draft
        .set_responsible_party(f.guest, f.meera, &directory)
        .unwrap();
    draft.redistribute(MoneyCents::new(5_01));

    let expense_id = engine
        .submit(SubmitExpenseCmd::from_draft(
            "Cinema",
            MoneyCents::new(5_01),
            draft,
        ))
        .await
        .unwrap();

    let expense = engine.expense(expense_id).await.unwrap();
    assert_eq!(expense.splits[1].consumer_id, f.guest);
    assert_eq!(expense.splits[1].responsible_id, f.meera);
    assert_eq!(expense.splits[1].amount, MoneyCents::new(2_50));
    assert_eq!(expense.splits[0].amount, MoneyCents::new(2_51));
}

#[tokio::test]
async fn empty_submission_is_rejected_without_writes() {
    let (engine, db) = engine_with_db().await;
    let f = flat(&engine).await;

    let err = engine
        .submit(SubmitExpenseCmd::new(
            "Nothing",
            MoneyCents::new(10_00),
            f.asha,
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::Validation("at least one consumer is required".to_string())
    );
    assert_eq!(count(&db, "expenses").await, 0);
    assert_eq!(count(&db, "splits").await, 0);
}

#[tokio::test]
async fn sum_mismatch_is_rejected() {
    let (engine, db) = engine_with_db().await;
    let f = flat(&engine).await;
    let directory = engine.directory().await.unwrap();

    let mut draft = Draft::for_payer(f.asha, &directory).unwrap();
    draft.select(f.ravi, &directory).unwrap();
    draft.redistribute(MoneyCents::new(10_00));

    let err = engine
        .submit(SubmitExpenseCmd::from_draft(
            "Groceries",
            MoneyCents::new(12_00),
            draft,
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::Validation("splits sum to 10.00, expected 12.00".to_string())
    );
    assert_eq!(count(&db, "expenses").await, 0);
}

#[tokio::test]
async fn submit_rechecks_members_against_directory() {
    let (engine, db) = engine_with_db().await;
    let f = flat(&engine).await;

    let owed_by_proxy = SubmitExpenseCmd::new("Snacks", MoneyCents::new(2_00), f.asha).splits(vec![
        DraftSplit {
            consumer_id: f.guest,
            responsible_id: f.tara,
            amount: MoneyCents::new(2_00),
        },
    ]);
    assert!(matches!(
        engine.submit(owed_by_proxy).await,
        Err(EngineError::InvalidResponsibleParty(_))
    ));

    let paying_for_someone_else = SubmitExpenseCmd::new("Snacks", MoneyCents::new(2_00), f.asha)
        .splits(vec![DraftSplit {
            consumer_id: f.meera,
            responsible_id: f.ravi,
            amount: MoneyCents::new(2_00),
        }]);
    assert!(matches!(
        engine.submit(paying_for_someone_else).await,
        Err(EngineError::InvalidResponsibleParty(_))
    ));

    let stranger = Uuid::new_v4();
    let unknown_consumer = SubmitExpenseCmd::new("Snacks", MoneyCents::new(2_00), f.asha)
        .splits(vec![DraftSplit {
            consumer_id: stranger,
            responsible_id: stranger,
            amount: MoneyCents::new(2_00),
        }]);
    assert_eq!(
        engine.submit(unknown_consumer).await.unwrap_err(),
        EngineError::UnknownMember(stranger.to_string())
    );

    let unknown_payer = SubmitExpenseCmd::new("Snacks", MoneyCents::new(2_00), stranger).splits(
        vec![DraftSplit {
            consumer_id: f.meera,
            responsible_id: f.meera,
            amount: MoneyCents::new(2_00),
        }],
    );
    assert_eq!(
        engine.submit(unknown_payer).await.unwrap_err(),
        EngineError::UnknownMember(stranger.to_string())
    );

    assert_eq!(count(&db, "expenses").await, 0);
}

#[tokio::test]
async fn failed_split_insert_leaves_no_orphan_expense() {
    let (engine, db) = engine_with_db().await;
    let f = flat(&engine).await;
    let directory = engine.directory().await.unwrap();

    db.execute_unprepared(
        "CREATE TRIGGER reject_splits BEFORE INSERT ON splits \
         BEGIN SELECT RAISE(ABORT, 'splits rejected'); END;",
    )
    .await
    .unwrap();

    let mut draft = Draft::for_payer(f.asha, &directory).unwrap();
    draft.select(f.ravi, &directory).unwrap();
    draft.redistribute(MoneyCents::new(8_00));

    let err = engine
        .submit(SubmitExpenseCmd::from_draft(
            "Gas bill",
            MoneyCents::new(8_00),
            draft,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Persistence(_)));
    assert_eq!(count(&db, "expenses").await, 0);
    assert_eq!(count(&db, "splits").await, 0);
    assert!(engine.list_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_expense_cascades_to_splits() {
    let (engine, db) = engine_with_db().await;
    let f = flat(&engine).await;
    let directory = engine.directory().await.unwrap();

    let mut draft = Draft::for_payer(f.asha, &directory).unwrap();
    draft.select(f.meera, &directory).unwrap();
    draft.redistribute(MoneyCents::new(4_00));
    engine
        .submit(SubmitExpenseCmd::from_draft(
            "Bread",
            MoneyCents::new(4_00),
            draft,
        ))
        .await
        .unwrap();
    assert_eq!(count(&db, "splits").await, 2);

    db.execute_unprepared("DELETE FROM expenses").await.unwrap();

    assert_eq!(count(&db, "splits").await, 0);
}

#[tokio::test]
async fn debts_too_large_to_add_up_are_an_error() {
    let (engine, _db) = engine_with_db().await;
    let f = flat(&engine).await;
    let huge = MoneyCents::new(5_000_000_000_000_000_000);

    for _ in 0..2 {
        let cmd = SubmitExpenseCmd::new("Rent", huge, f.asha).splits(vec![DraftSplit {
            consumer_id: f.ravi,
            responsible_id: f.ravi,
            amount: huge,
        }]);
        engine.submit(cmd).await.unwrap();
    }

    assert!(matches!(
        engine.outstanding_debts().await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn lists_expenses_and_filters_by_payer() {
    let (engine, _db) = engine_with_db().await;
    let f = flat(&engine).await;
    let directory = engine.directory().await.unwrap();

    let mut by_asha = Draft::for_payer(f.asha, &directory).unwrap();
    by_asha.select(f.ravi, &directory).unwrap();
    by_asha.redistribute(MoneyCents::new(6_00));
    let first = engine
        .submit(SubmitExpenseCmd::from_draft(
            "Milk",
            MoneyCents::new(6_00),
            by_asha,
        ))
        .await
        .unwrap();

    let mut by_ravi = Draft::for_payer(f.ravi, &directory).unwrap();
    by_ravi.select(f.tara, &directory).unwrap();
    by_ravi.select(f.meera, &directory).unwrap();
    by_ravi.redistribute(MoneyCents::new(7_00));
    let second = engine
        .submit(SubmitExpenseCmd::from_draft(
            "Eggs",
            MoneyCents::new(7_00),
            by_ravi,
        ))
        .await
        .unwrap();

    let all = engine.list_expenses().await.unwrap();
    let mut ids: Vec<_> = all.iter().map(|e| e.id).collect();
    ids.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(ids, expected);
    for expense in &all {
        let sum: MoneyCents = expense.splits.iter().map(|s| s.amount).sum();
        assert_eq!(sum, expense.total);
    }

    let ravis = engine.expenses_paid_by(f.ravi).await.unwrap();
    assert_eq!(ravis.len(), 1);
    assert_eq!(ravis[0].id, second);
    assert_eq!(ravis[0].splits.len(), 3);

    // Tara's share on Ravi's own expense is Ravi's; only Meera owes him.
    let debts = engine.outstanding_debts().await.unwrap();
    assert!(debts.contains(&Debt {
        debtor_id: f.ravi,
        creditor_id: f.asha,
        amount: MoneyCents::new(3_00),
    }));
    assert!(debts.contains(&Debt {
        debtor_id: f.meera,
        creditor_id: f.ravi,
        amount: MoneyCents::new(2_33),
    }));
    assert_eq!(debts.len(), 2);
}

#[tokio::test]
async fn unknown_expense_is_reported() {
    let (engine, _db) = engine_with_db().await;
    let id = Uuid::new_v4();
    assert_eq!(
        engine.expense(id).await.unwrap_err(),
        EngineError::KeyNotFound(id.to_string())
    );
}

#[tokio::test]
async fn add_member_validates_guardians() {
    let (engine, db) = engine_with_db().await;
    let f = flat(&engine).await;

    assert!(matches!(
        engine
            .add_member(NewMemberCmd::proxy("Baby", Some(f.tara)))
            .await,
        Err(EngineError::InvalidResponsibleParty(_))
    ));
    let missing = Uuid::new_v4();
    assert_eq!(
        engine
            .add_member(NewMemberCmd::proxy("Baby", Some(missing)))
            .await
            .unwrap_err(),
        EngineError::UnknownMember(missing.to_string())
    );
    let mut adult_with_guardian = NewMemberCmd::new("Dev");
    adult_with_guardian.guardian_id = Some(f.ravi);
    assert!(matches!(
        engine.add_member(adult_with_guardian).await,
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine.add_member(NewMemberCmd::new("   ")).await,
        Err(EngineError::Validation(_))
    ));

    assert_eq!(count(&db, "profiles").await, 5);
}

#[tokio::test]
async fn directory_reads_back_members() {
    let (engine, _db) = engine_with_db().await;
    let f = flat(&engine).await;

    let directory = engine.directory().await.unwrap();
    let names: Vec<_> = directory
        .members()
        .iter()
        .map(|m| m.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Asha", "Guest", "Meera", "Ravi", "Tara"]);

    let candidates: Vec<_> = directory
        .responsible_candidates()
        .map(|m| m.display_name.as_str())
        .collect();
    assert_eq!(candidates, vec!["Asha", "Meera", "Ravi"]);

    let tara = engine.member(f.tara).await.unwrap();
    assert!(tara.is_proxy);
    assert_eq!(tara.guardian_id, Some(f.ravi));
    assert!(engine.member(f.asha).await.unwrap().is_admin);
    assert!(!engine.member(f.ravi).await.unwrap().is_admin);
    assert!(matches!(
        engine.member(Uuid::new_v4()).await,
        Err(EngineError::UnknownMember(_))
    ));
}
