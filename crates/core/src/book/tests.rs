//! Tests for book mutations, trash orchestration and document round-trips.

use chrono::{DateTime, Duration, TimeZone, Utc};
use emanet_shared::{CustomerId, ValueTypeId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use super::{Book, BookPolicy, Collection, Documents};
use crate::balance::BalanceEngine;
use crate::ledger::{
    CustomerUpdate, DepositDirection, LedgerError, LoanDirection, NewCustomer, NewDeposit, NewLoan,
    TransactionUpdate,
};
use crate::registry::{NewValueType, Unit, ValueTypeUpdate};
use crate::trash::{EntityKind, TrashError};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single().unwrap_or_default()
}

fn new_customer(first: &str, last: &str) -> NewCustomer {
    NewCustomer {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..NewCustomer::default()
    }
}

fn gold_type() -> NewValueType {
    NewValueType {
        id: Some(ValueTypeId::from_key("gold")),
        name: "22 Ayar Bilezik".to_string(),
        symbol: "22K".to_string(),
        unit: Unit::Weight,
        color: Some("#FFD700".to_string()),
        description: None,
    }
}

/// A book with one value type and one customer.
fn seeded() -> (Book, CustomerId, ValueTypeId) {
    let mut book = Book::new(BookPolicy::default());
    let gold = book.add_value_type(gold_type(), now()).unwrap().value.id;
    let customer = book
        .add_customer(new_customer("Ahmet", "Yılmaz"), now())
        .unwrap()
        .value
        .id;
    (book, customer, gold)
}

#[test]
fn test_add_customer_assigns_sequence_numbers() {
    let mut book = Book::new(BookPolicy::default());
    let a = book.add_customer(new_customer("Ahmet", "Yılmaz"), now()).unwrap();
    let b = book.add_customer(new_customer("Fatma", "Demir"), now()).unwrap();
    assert_eq!(a.value.sequence_number, 1);
    assert_eq!(b.value.sequence_number, 2);
    assert_eq!(a.touched.into_iter().collect::<Vec<_>>(), [Collection::Customers]);
}

#[test]
fn test_add_customer_rejects_duplicate_and_blank_names() {
    let (mut book, _, _) = seeded();
    let err = book
        .add_customer(new_customer("  AHMET", "yılmaz "), now())
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateCustomer(_)));
    assert!(err.is_validation());

    let err = book.add_customer(new_customer(" ", "Kaya"), now()).unwrap_err();
    assert_eq!(err, LedgerError::MissingField("firstName"));
}

#[test]
fn test_update_customer_checks_other_names_only() {
    let (mut book, ahmet, _) = seeded();
    let fatma = book
        .add_customer(new_customer("Fatma", "Demir"), now())
        .unwrap()
        .value
        .id;

    let same_name = CustomerUpdate {
        phone: Some("0532 123 4567".to_string()),
        first_name: Some("Ahmet".to_string()),
        ..CustomerUpdate::default()
    };
    let updated = book.update_customer(&ahmet, same_name, now()).unwrap();
    assert_eq!(updated.value.phone.as_deref(), Some("0532 123 4567"));

    let clash = CustomerUpdate {
        first_name: Some("Ahmet".to_string()),
        last_name: Some("Yılmaz".to_string()),
        ..CustomerUpdate::default()
    };
    assert!(matches!(
        book.update_customer(&fatma, clash, now()),
        Err(LedgerError::DuplicateCustomer(_))
    ));
}

#[test]
fn test_record_deposit_validation_order() {
    let (mut book, customer, gold) = seeded();

    let missing_customer = NewDeposit {
        customer_id: None,
        ..NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::In, dec!(1))
    };
    assert_eq!(
        book.record_deposit(missing_customer, now()).unwrap_err(),
        LedgerError::MissingField("customerId")
    );

    let zero = NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::In, Decimal::ZERO);
    assert_eq!(
        book.record_deposit(zero, now()).unwrap_err(),
        LedgerError::NonPositiveAmount
    );

    let unknown_type = NewDeposit::new(
        customer.clone(),
        ValueTypeId::from_key("silver"),
        DepositDirection::In,
        dec!(1),
    );
    assert!(matches!(
        book.record_deposit(unknown_type, now()),
        Err(LedgerError::ValueTypeNotFound(_))
    ));

    let unknown_customer =
        NewDeposit::new(CustomerId::from_key("ghost"), gold, DepositDirection::In, dec!(1));
    assert!(matches!(
        book.record_deposit(unknown_customer, now()),
        Err(LedgerError::CustomerNotFound(_))
    ));
    assert_eq!(book.deposits().count(), 0);
}

#[test]
fn test_withdrawal_limited_by_deposit_balance_with_tolerance() {
    let (mut book, customer, gold) = seeded();
    book.record_deposit(
        NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::In, dec!(50)),
        now(),
    )
    .unwrap();

    let too_much = NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::Out, dec!(50.02));
    assert_eq!(
        book.record_deposit(too_much, now()).unwrap_err(),
        LedgerError::InsufficientBalance {
            requested: dec!(50.02),
            available: dec!(50)
        }
    );

    let within = NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::Out, dec!(50.01));
    book.record_deposit(within, now()).unwrap();
    assert_eq!(
        BalanceEngine::customer_deposit_totals(book.deposits(), &customer)[&gold],
        Decimal::ZERO
    );
}

#[test]
fn test_repayment_limited_by_outstanding_loan() {
    let (mut book, customer, gold) = seeded();
    let repay = NewLoan::new(customer.clone(), gold.clone(), LoanDirection::Repay, dec!(1));
    assert!(matches!(
        book.record_loan(repay, now()),
        Err(LedgerError::InsufficientBalance { .. })
    ));

    book.record_loan(
        NewLoan::new(customer.clone(), gold.clone(), LoanDirection::Out, dec!(10)),
        now(),
    )
    .unwrap();
    let repay = NewLoan::new(customer.clone(), gold.clone(), LoanDirection::Repay, dec!(4))
        .with_description("  kısmi ödeme ");
    let loan = book.record_loan(repay, now()).unwrap().value;
    assert_eq!(loan.description.as_deref(), Some("kısmi ödeme"));
    assert_eq!(
        BalanceEngine::outstanding_loan(book.loans(), &customer, &gold),
        dec!(6)
    );
}

#[test]
fn test_scenario_net_position_after_loan() {
    let (mut book, customer, gold) = seeded();
    for (direction, amount) in [(DepositDirection::In, dec!(100)), (DepositDirection::Out, dec!(30))] {
        book.record_deposit(NewDeposit::new(customer.clone(), gold.clone(), direction, amount), now())
            .unwrap();
    }
    assert_eq!(
        BalanceEngine::customer_deposit_totals(book.deposits(), &customer)[&gold],
        dec!(70)
    );

    book.record_loan(
        NewLoan::new(customer.clone(), gold.clone(), LoanDirection::Out, dec!(40)),
        now(),
    )
    .unwrap();
    let net = BalanceEngine::net_position(book.deposits(), book.loans(), &customer);
    assert_eq!(net[&gold], dec!(30));
    assert_eq!(
        BalanceEngine::customer_deposit_totals(book.deposits(), &customer)[&gold],
        dec!(70)
    );
}

#[test]
fn test_update_deposit_rechecks_withdrawal() {
    let (mut book, customer, gold) = seeded();
    book.record_deposit(
        NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::In, dec!(20)),
        now(),
    )
    .unwrap();
    let out = book
        .record_deposit(
            NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::Out, dec!(5)),
            now(),
        )
        .unwrap()
        .value;

    let grow = TransactionUpdate {
        amount: Some(dec!(20)),
        ..TransactionUpdate::default()
    };
    let updated = book.update_deposit(&out.id, grow, now() + Duration::hours(1)).unwrap();
    assert_eq!(updated.value.amount, dec!(20));
    assert_eq!(updated.value.created_at, now());
    assert_eq!(updated.value.updated_at, now() + Duration::hours(1));

    let overdraw = TransactionUpdate {
        amount: Some(dec!(21)),
        ..TransactionUpdate::default()
    };
    assert!(matches!(
        book.update_deposit(&out.id, overdraw, now()),
        Err(LedgerError::InsufficientBalance { .. })
    ));
    assert_eq!(book.deposit(&out.id).map(|d| d.amount), Some(dec!(20)));
}

#[test]
fn test_value_type_unit_locked_once_referenced() {
    let (mut book, customer, gold) = seeded();
    let to_count = ValueTypeUpdate {
        unit: Some(Unit::Count),
        ..ValueTypeUpdate::default()
    };
    book.update_value_type(&gold, to_count.clone(), now()).unwrap();
    book.update_value_type(
        &gold,
        ValueTypeUpdate {
            unit: Some(Unit::Weight),
            ..ValueTypeUpdate::default()
        },
        now(),
    )
    .unwrap();

    book.record_deposit(
        NewDeposit::new(customer, gold.clone(), DepositDirection::In, dec!(1)),
        now(),
    )
    .unwrap();
    assert_eq!(
        book.update_value_type(&gold, to_count, now()).unwrap_err(),
        LedgerError::UnitLocked(gold.clone())
    );

    let rename = ValueTypeUpdate {
        name: Some("24 Ayar".to_string()),
        ..ValueTypeUpdate::default()
    };
    let renamed = book.update_value_type(&gold, rename, now()).unwrap();
    assert_eq!(renamed.value.name, "24 Ayar");
    assert_eq!(renamed.value.unit, Unit::Weight);
}

#[test]
fn test_delete_value_type_leaves_orphans() {
    let (mut book, customer, gold) = seeded();
    book.record_deposit(
        NewDeposit::new(customer, gold.clone(), DepositDirection::In, dec!(3)),
        now(),
    )
    .unwrap();
    let applied = book.delete_value_type(&gold, now()).unwrap();
    assert_eq!(applied.value.kind(), EntityKind::ValueType);
    assert_eq!(book.deposits().count(), 1);
    assert!(!book.value_type(&gold).is_found());
    assert!(applied.touched.contains(&Collection::ValueTypes));
    assert!(!applied.touched.contains(&Collection::Deposits));
}

#[test]
fn test_scenario_customer_delete_cascades_into_four_entries() {
    let (mut book, customer, gold) = seeded();
    let other = book
        .add_customer(new_customer("Mehmet", "Kaya"), now())
        .unwrap()
        .value
        .id;
    for amount in [dec!(10), dec!(5)] {
        book.record_deposit(
            NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::In, amount),
            now(),
        )
        .unwrap();
    }
    book.record_loan(
        NewLoan::new(customer.clone(), gold.clone(), LoanDirection::Out, dec!(2)),
        now(),
    )
    .unwrap();
    book.record_deposit(
        NewDeposit::new(other.clone(), gold.clone(), DepositDirection::In, dec!(1)),
        now(),
    )
    .unwrap();

    let applied = book.delete_customer(&customer, now()).unwrap();
    assert_eq!(applied.value.len(), 4);
    assert_eq!(book.trash().len(), 4);
    assert_eq!(book.trash().of_kind(EntityKind::Customer).count(), 1);
    assert_eq!(book.trash().of_kind(EntityKind::Deposit).count(), 2);
    assert_eq!(book.trash().of_kind(EntityKind::Loan).count(), 1);
    assert!(!book.customer(&customer).is_found());
    assert!(book.customer_deposits(&customer).is_empty());
    assert!(book.customer_loans(&customer).is_empty());
    assert_eq!(book.customer_deposits(&other).len(), 1);
    assert_eq!(applied.touched.len(), 4);
}

#[test]
fn test_restoring_customer_does_not_restore_transactions() {
    let (mut book, customer, gold) = seeded();
    book.record_deposit(
        NewDeposit::new(customer.clone(), gold, DepositDirection::In, dec!(10)),
        now(),
    )
    .unwrap();
    book.delete_customer(&customer, now()).unwrap();

    let customer_entry = book
        .trash()
        .of_kind(EntityKind::Customer)
        .map(|e| e.id.clone())
        .next()
        .unwrap();
    let restored = book.restore_from_trash(&customer_entry).unwrap();
    assert_eq!(
        restored.touched.into_iter().collect::<Vec<_>>(),
        [Collection::Customers, Collection::Trash]
    );
    assert!(book.customer(&customer).is_found());
    assert!(book.customer_deposits(&customer).is_empty());
    assert_eq!(book.trash().of_kind(EntityKind::Deposit).count(), 1);
}

#[test]
fn test_restore_round_trip_preserves_value() {
    let (mut book, customer, gold) = seeded();
    let deposit = book
        .record_deposit(
            NewDeposit::new(customer, gold, DepositDirection::In, dec!(7.25)),
            now(),
        )
        .unwrap()
        .value;
    let before = book.clone();

    let entry = book.delete_deposit(&deposit.id, now()).unwrap().value;
    assert_eq!(book.deposits().count(), 0);
    book.restore_from_trash(&entry.id).unwrap();

    assert_eq!(book, before);
    assert!(book.trash().is_empty());
}

#[test]
fn test_restore_conflict_keeps_entry() {
    let (mut book, customer, _) = seeded();
    book.delete_customer(&customer, now()).unwrap();
    book.add_customer(new_customer("AHMET", "yılmaz"), now()).unwrap();

    let entry = book.trash().iter().next().map(|e| e.id.clone()).unwrap();
    let err = book.restore_from_trash(&entry).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Trash(TrashError::RestoreConflict { .. })
    ));
    assert_eq!(err.error_code(), "RESTORE_CONFLICT");
    assert_eq!(book.trash().len(), 1);
}

#[test]
fn test_trash_operations_on_unknown_entry() {
    let (mut book, _, _) = seeded();
    let missing = emanet_shared::TrashEntryId::from_key("nope");
    assert!(matches!(
        book.restore_from_trash(&missing),
        Err(LedgerError::Trash(TrashError::NotFound(_)))
    ));
    assert!(matches!(
        book.permanently_delete(&missing),
        Err(LedgerError::Trash(TrashError::NotFound(_)))
    ));
}

#[test]
fn test_sweep_and_empty_report_touched_only_on_change() {
    let (mut book, customer, _) = seeded();
    book.delete_customer(&customer, now()).unwrap();

    let early = book.sweep_expired(now() + Duration::days(10));
    assert_eq!(early.value, 0);
    assert!(early.touched.is_empty());

    let late = book.sweep_expired(now() + Duration::days(31));
    assert_eq!(late.value, 1);
    assert!(late.touched.contains(&Collection::Trash));
    assert_eq!(book.sweep_expired(now() + Duration::days(31)).value, 0);

    assert!(book.empty_trash().touched.is_empty());
}

#[test]
fn test_permanent_delete_leaves_origin_untouched() {
    let (mut book, customer, gold) = seeded();
    let loan = book
        .record_loan(
            NewLoan::new(customer, gold, LoanDirection::Out, dec!(3)),
            now(),
        )
        .unwrap()
        .value;
    let entry = book.delete_loan(&loan.id, now()).unwrap().value;
    let applied = book.permanently_delete(&entry.id).unwrap();
    assert_eq!(applied.touched.into_iter().collect::<Vec<_>>(), [Collection::Trash]);
    assert!(book.trash().is_empty());
    assert!(book.loan(&loan.id).is_none());
}

#[test]
fn test_documents_round_trip() {
    let (mut book, customer, gold) = seeded();
    book.record_deposit(
        NewDeposit::new(customer.clone(), gold.clone(), DepositDirection::In, dec!(12.5)),
        now(),
    )
    .unwrap();
    book.record_loan(
        NewLoan::new(customer.clone(), gold, LoanDirection::Out, dec!(2)),
        now(),
    )
    .unwrap();
    book.add_customer(new_customer("Fatma", "Demir"), now()).unwrap();
    let fatma = book
        .customers()
        .find(|c| c.first_name == "Fatma")
        .map(|c| c.id.clone())
        .unwrap();
    book.delete_customer(&fatma, now()).unwrap();

    let documents: Documents = Collection::ALL
        .into_iter()
        .map(|c| (c, book.to_document(c).unwrap()))
        .collect();
    let loaded = Book::from_documents(&documents, BookPolicy::default());
    assert!(loaded.rejected.is_empty());
    assert_eq!(loaded.book, book);
}

#[test]
fn test_from_documents_reads_legacy_store() {
    let documents: Documents = [
        (
            Collection::Customers,
            json!({"demo-musteri-1": {"id": "demo-musteri-1", "ad": "Ahmet", "soyad": "Yılmaz", "sira": 1}}),
        ),
        (
            Collection::ValueTypes,
            json!({"demo-tur-1": {"ad": "22 Ayar Bilezik", "takipSekli": "gram"}}),
        ),
        (
            Collection::Deposits,
            json!({
                "e1": {"musteriId": "demo-musteri-1", "turId": "demo-tur-1", "miktar": 500.0, "islemTipi": "emanet-birak"},
                "e2": {"musteriId": "demo-musteri-1", "turId": "demo-tur-1", "miktar": "abc", "islemTipi": "emanet-birak"},
                "e3": {"musteriId": "demo-musteri-1", "turId": "demo-tur-1", "miktar": 1, "islemTipi": "transfer"}
            }),
        ),
        (Collection::Trash, Value::Null),
    ]
    .into_iter()
    .collect();

    let loaded = Book::from_documents(&documents, BookPolicy::default());
    let book = loaded.book;
    let customer = CustomerId::from_key("demo-musteri-1");
    let gold = ValueTypeId::from_key("demo-tur-1");

    assert_eq!(loaded.rejected.len(), 1);
    assert_eq!(loaded.rejected[0].0, Collection::Deposits);
    assert!(book.value_type(&gold).is_found());
    assert_eq!(book.deposits().count(), 2);
    assert_eq!(
        BalanceEngine::customer_deposit_totals(book.deposits(), &customer)[&gold],
        dec!(500)
    );
    assert!(book.trash().is_empty());
}


#[test]
fn test_unreadable_records_survive_a_write() {
    let documents: Documents = [
        (
            Collection::Customers,
            json!({"m1": {"id": "m1", "ad": "Ahmet", "soyad": "Yılmaz", "sira": 1}}),
        ),
        (
            Collection::ValueTypes,
            json!({"t1": {"ad": "Çeyrek", "takipSekli": "adet"}}),
        ),
        (
            Collection::Deposits,
            json!({
                "legacy": {"musteriId": "m1", "turId": "t1", "miktar": 2, "islemTipi": "emanet-iade"},
                "ok": {"musteriId": "m1", "turId": "t1", "miktar": 5, "islemTipi": "emanet-birak"}
            }),
        ),
        (Collection::Trash, json!({"broken": {"type": "customer", "data": 42}})),
    ]
    .into_iter()
    .collect();

    let mut book = Book::from_documents(&documents, BookPolicy::default()).book;
    assert_eq!(book.deposits().count(), 1);
    assert_eq!(book.unreadable(Collection::Deposits).count(), 1);
    assert!(book.trash().is_empty());

    let applied = book
        .record_deposit(
            NewDeposit::new(
                CustomerId::from_key("m1"),
                ValueTypeId::from_key("t1"),
                DepositDirection::In,
                dec!(1),
            ),
            now(),
        )
        .unwrap();
    let written = book.to_documents(&applied.touched).unwrap();
    let deposits = written[&Collection::Deposits].as_object().unwrap();
    assert_eq!(deposits.len(), 3);
    assert_eq!(deposits["legacy"], documents[&Collection::Deposits]["legacy"]);
    assert!(deposits.contains_key("ok"));

    // Reading the written document gives the same split again.
    let reread = Book::from_documents(&written, BookPolicy::default());
    assert_eq!(reread.rejected.len(), 1);
    assert_eq!(reread.rejected[0].1.key, "legacy");

    let trash = book.to_document(Collection::Trash).unwrap();
    assert_eq!(trash["broken"], json!({"type": "customer", "data": 42}));
}

#[test]
fn test_fixed_collection_clears_unreadable() {
    let mut book = Book::new(BookPolicy::default());
    book.replace_collection(
        Collection::Loans,
        Some(&json!({"x": {"musteriId": "m1", "turId": "t1", "islemTipi": "?"}})),
    );
    assert_eq!(book.unreadable(Collection::Loans).count(), 1);

    book.replace_collection(Collection::Loans, Some(&json!({})));
    assert_eq!(book.unreadable(Collection::Loans).count(), 0);
    assert_eq!(book.to_document(Collection::Loans).unwrap(), json!({}));
}
