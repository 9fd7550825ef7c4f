//! Folds over the deposit and loan logs.

use std::collections::{BTreeMap, BTreeSet};

use emanet_shared::{CustomerId, ValueTypeId};
use rust_decimal::Decimal;

use super::types::{BalanceKind, BalanceLine, BookSummary, Debtor, NetStatus};
use crate::ledger::{Customer, DepositTransaction, LoanTransaction, Movement};

/// Amounts keyed by value type.
pub type TypeTotals = BTreeMap<ValueTypeId, Decimal>;

/// Balance engine for running totals and net positions.
///
/// Every function is a pure fold of the collections it is given. Inputs are
/// taken as iterators of references, so callers can pass slices, map values
/// or filtered views without cloning.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Signed sum per value type over the movements accepted by `keep`.
    fn signed_totals<'a, T, I, F>(items: I, keep: F) -> TypeTotals
    where
        T: Movement + 'a,
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> bool,
    {
        let mut totals = TypeTotals::new();
        for item in items.into_iter().filter(|item| keep(item)) {
            *totals.entry(item.value_type_id().clone()).or_default() += item.signed_amount();
        }
        totals
    }

    /// Clamps negative totals to zero, keeping every touched type.
    fn floored(mut totals: TypeTotals) -> TypeTotals {
        for amount in totals.values_mut() {
            if amount.is_sign_negative() {
                *amount = Decimal::ZERO;
            }
        }
        totals
    }

    fn without_zeros(mut totals: TypeTotals) -> TypeTotals {
        totals.retain(|_, amount| !amount.is_zero());
        totals
    }

    /// Deposits held for one customer, per value type.
    ///
    /// `deposit-in` adds, `deposit-out` subtracts. A type whose withdrawals
    /// exceed its deposits is reported as zero, never negative.
    #[must_use]
    pub fn customer_deposit_totals<'a>(
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
        customer_id: &CustomerId,
    ) -> TypeTotals {
        Self::floored(Self::signed_totals(deposits, |d| &d.customer_id == customer_id))
    }

    /// Loans owed by one customer, per value type. Floored like deposits.
    #[must_use]
    pub fn customer_loan_totals<'a>(
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
        customer_id: &CustomerId,
    ) -> TypeTotals {
        Self::floored(Self::signed_totals(loans, |l| &l.customer_id == customer_id))
    }

    /// Net position of one customer: deposits minus loans, per value type.
    ///
    /// Computed from the raw signed movements, not from the floored totals.
    /// Positive means the shop owes the customer. Types netting to exactly
    /// zero are omitted.
    #[must_use]
    pub fn net_position<'a>(
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
        customer_id: &CustomerId,
    ) -> TypeTotals {
        let mut net = Self::signed_totals(deposits, |d| &d.customer_id == customer_id);
        for (value_type_id, owed) in Self::signed_totals(loans, |l| &l.customer_id == customer_id)
        {
            *net.entry(value_type_id).or_default() -= owed;
        }
        Self::without_zeros(net)
    }

    /// [`Self::net_position`] classified into credit or debt.
    #[must_use]
    pub fn net_position_status<'a>(
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
        customer_id: &CustomerId,
    ) -> BTreeMap<ValueTypeId, NetStatus> {
        Self::net_position(deposits, loans, customer_id)
            .into_iter()
            .filter_map(|(id, net)| NetStatus::from_net(net).map(|status| (id, status)))
            .collect()
    }

    /// Deposits across all customers, per value type, floored at zero.
    #[must_use]
    pub fn book_deposit_totals<'a>(
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
    ) -> TypeTotals {
        Self::floored(Self::signed_totals(deposits, |_| true))
    }

    /// Loans across all customers, per value type, floored at zero.
    #[must_use]
    pub fn book_loan_totals<'a>(
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
    ) -> TypeTotals {
        Self::floored(Self::signed_totals(loans, |_| true))
    }

    /// Sum of every listed customer's net position, per value type.
    ///
    /// Movements of customers not in `customers` (orphans) do not count.
    /// Types summing to zero are omitted.
    #[must_use]
    pub fn book_net_position<'a>(
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
        customers: impl IntoIterator<Item = &'a Customer>,
    ) -> TypeTotals {
        let active: BTreeSet<&CustomerId> = customers.into_iter().map(|c| &c.id).collect();
        let mut net = Self::signed_totals(deposits, |d| active.contains(&d.customer_id));
        for (value_type_id, owed) in
            Self::signed_totals(loans, |l| active.contains(&l.customer_id))
        {
            *net.entry(value_type_id).or_default() -= owed;
        }
        Self::without_zeros(net)
    }

    /// Customer balance card: positive floored totals from both logs.
    ///
    /// When a type has both a deposit and a loan balance the loan line is
    /// shown.
    #[must_use]
    pub fn customer_balance<'a>(
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
        customer_id: &CustomerId,
    ) -> BTreeMap<ValueTypeId, BalanceLine> {
        let lines = |totals: TypeTotals, kind| {
            totals
                .into_iter()
                .filter(|(_, amount)| *amount > Decimal::ZERO)
                .map(move |(id, amount)| (id, BalanceLine { kind, amount }))
        };
        let mut card: BTreeMap<_, _> = lines(
            Self::customer_deposit_totals(deposits, customer_id),
            BalanceKind::Deposit,
        )
        .collect();
        card.extend(lines(
            Self::customer_loan_totals(loans, customer_id),
            BalanceKind::Loan,
        ));
        card
    }

    /// Customers owing the given value type, ordered by sequence number.
    #[must_use]
    pub fn debtors_for_type<'a>(
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
        customers: impl IntoIterator<Item = &'a Customer>,
        value_type_id: &ValueTypeId,
    ) -> Vec<Debtor> {
        let mut owed: BTreeMap<&CustomerId, Decimal> = BTreeMap::new();
        for loan in loans.into_iter().filter(|l| &l.value_type_id == value_type_id) {
            *owed.entry(&loan.customer_id).or_default() += loan.signed_amount();
        }

        let mut debtors: Vec<Debtor> = customers
            .into_iter()
            .filter_map(|customer| {
                let amount = owed.get(&customer.id).copied()?;
                (amount > Decimal::ZERO).then(|| Debtor {
                    customer_id: customer.id.clone(),
                    full_name: customer.full_name(),
                    sequence_number: customer.sequence_number,
                    amount,
                })
            })
            .collect();
        debtors.sort_by(|a, b| {
            a.sequence_number
                .cmp(&b.sequence_number)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        debtors
    }

    /// Headline counts for the dashboard.
    #[must_use]
    pub fn book_summary<'a>(
        customers: impl IntoIterator<Item = &'a Customer>,
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
    ) -> BookSummary {
        let positive = |totals: TypeTotals| totals.values().filter(|a| **a > Decimal::ZERO).count();
        BookSummary {
            customer_count: customers.into_iter().count(),
            deposit_type_count: positive(Self::book_deposit_totals(deposits)),
            loan_type_count: positive(Self::book_loan_totals(loans)),
        }
    }

    /// Deposit balance available for withdrawal.
    #[must_use]
    pub fn available_deposit<'a>(
        deposits: impl IntoIterator<Item = &'a DepositTransaction>,
        customer_id: &CustomerId,
        value_type_id: &ValueTypeId,
    ) -> Decimal {
        Self::customer_deposit_totals(deposits, customer_id)
            .get(value_type_id)
            .copied()
            .unwrap_or_default()
    }

    /// Loan balance open for repayment.
    #[must_use]
    pub fn outstanding_loan<'a>(
        loans: impl IntoIterator<Item = &'a LoanTransaction>,
        customer_id: &CustomerId,
        value_type_id: &ValueTypeId,
    ) -> Decimal {
        Self::customer_loan_totals(loans, customer_id)
            .get(value_type_id)
            .copied()
            .unwrap_or_default()
    }
}
