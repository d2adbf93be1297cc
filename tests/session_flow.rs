use bordero_core::{
    core::{EditSession, Field, LedgerEdit, NotificationKind, SessionMode},
    currency::LocaleConfig,
    errors::{LedgerError, SessionError},
    ledger::{EventInfo, EventLedger, ProfitShare, RevenueLine, DEFAULT_PARTNER_NAME},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 12).unwrap()
}

fn loaded_ledger() -> EventLedger {
    EventLedger::new(
        EventInfo::new("Stand-up Night", "12/04/2024", "Teatro Municipal"),
        vec![
            RevenueLine::new("Sympla", dec!(2000), dec!(200)).unwrap(),
            RevenueLine::new("Pix", dec!(500), dec!(0)).unwrap(),
        ],
        dec!(150),
        vec![
            ProfitShare::new("Stand-up Night", dec!(50), dec!(1250)),
            ProfitShare::new("SãoCarlino", dec!(50), dec!(1250)),
        ],
    )
    .unwrap()
}

#[test]
fn edit_then_save_publishes_the_working_copy() {
    let mut session = EditSession::new(loaded_ledger());
    session.begin_edit().unwrap();
    session
        .apply_input(Field::RevenueDiscount(0), "R$ 300,00")
        .unwrap();

    // the committed value is untouched until save
    assert_eq!(session.committed().revenues[0].net, dec!(1800));
    assert_eq!(session.current().revenues[0].net, dec!(1700));

    let notification = session.commit().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, "Values saved successfully!");
    assert_eq!(session.mode(), SessionMode::Viewing);
    assert_eq!(session.committed().total_net, dec!(2200));
    assert_eq!(session.committed().total_gross, dec!(2500));
}

#[test]
fn cancel_restores_every_field() {
    let original = loaded_ledger();
    let mut session = EditSession::new(original.clone());
    session.begin_edit().unwrap();
    for (field, raw) in [
        (Field::EventName, "Outro Show"),
        (Field::EventDate, "01/01/2025"),
        (Field::EventLocation, "Praça"),
        (Field::RevenueGross(1), "900"),
        (Field::RevenueDiscount(0), "abc"),
        (Field::SharePercentage(0), "70"),
        (Field::ShareAmount(1), "R$ 1,00"),
    ] {
        session.apply_input(field, raw).unwrap();
    }
    assert_ne!(session.current(), &original);

    let notification = session.discard().unwrap();
    assert_eq!(notification.kind, NotificationKind::Info);
    assert_eq!(notification.message, "Editing cancelled.");
    assert_eq!(session.current(), &original);
    assert_eq!(session.committed(), &original);
}

#[test]
fn new_statement_is_a_blank_template() {
    let (session, notification) =
        EditSession::from_template(EventLedger::template(today(), DEFAULT_PARTNER_NAME));
    assert_eq!(
        notification.message,
        "New statement created! Fill in the values."
    );
    assert!(session.is_editing());

    let ledger = session.current();
    assert_eq!(ledger.event.name, "Novo Evento");
    assert_eq!(ledger.event.date, "12/04/2024");
    assert_eq!(ledger.revenues.len(), 2);
    assert!(ledger
        .revenues
        .iter()
        .all(|line| line.gross.is_zero() && line.net.is_zero()));
    assert_eq!(ledger.shares.len(), 2);
    assert!(ledger
        .shares
        .iter()
        .all(|share| share.percentage == dec!(50) && share.amount.is_zero()));
}

#[test]
fn renaming_the_template_event_renames_the_first_share_only() {
    let (mut session, _) =
        EditSession::from_template(EventLedger::template(today(), DEFAULT_PARTNER_NAME));
    session.apply_input(Field::EventName, "Show X").unwrap();
    let ledger = session.current();
    assert_eq!(ledger.event.name, "Show X");
    assert_eq!(ledger.shares[0].beneficiary, "Show X");
    assert_eq!(ledger.shares[1].beneficiary, DEFAULT_PARTNER_NAME);
}

#[test]
fn revenue_edits_do_not_cascade_into_shares() {
    let mut session = EditSession::new(loaded_ledger());
    session.begin_edit().unwrap();
    session.apply_input(Field::RevenueGross(0), "4000").unwrap();
    let ledger = session.current();
    assert_eq!(ledger.total_gross, dec!(4500));
    assert_eq!(ledger.shares[0].amount, dec!(1250));

    // editing the percentage picks up the new total
    session.apply_input(Field::SharePercentage(0), "50").unwrap();
    assert_eq!(session.current().shares[0].amount, dec!(2250));
}

#[test]
fn percentage_extremes_are_exact() {
    let mut session = EditSession::new(loaded_ledger());
    session.begin_edit().unwrap();
    session.apply_input(Field::SharePercentage(0), "0").unwrap();
    assert_eq!(session.current().shares[0].amount, Decimal::ZERO);
    session.apply_input(Field::SharePercentage(1), "100%").unwrap();
    assert_eq!(session.current().shares[1].amount, dec!(2500));
}

#[test]
fn totals_follow_every_revenue_edit() {
    let mut session = EditSession::new(loaded_ledger());
    session.begin_edit().unwrap();
    let edits = [
        LedgerEdit::RevenueGross {
            index: 1,
            amount: dec!(10.55),
        },
        LedgerEdit::RevenueDiscount {
            index: 0,
            amount: dec!(2500),
        },
        LedgerEdit::RevenueGross {
            index: 0,
            amount: dec!(0),
        },
    ];
    for edit in &edits {
        session.apply(edit).unwrap();
        let ledger = session.current();
        let gross: Decimal = ledger.revenues.iter().map(|line| line.gross).sum();
        let net: Decimal = ledger.revenues.iter().map(|line| line.net).sum();
        assert_eq!(ledger.total_gross, gross);
        assert_eq!(ledger.total_net, net);
        for line in &ledger.revenues {
            assert_eq!(line.net, line.gross - line.discount);
        }
    }
    assert_eq!(session.current().total_net, dec!(-2489.45));
}

#[test]
fn invalid_transitions_are_reported() {
    let mut session = EditSession::new(loaded_ledger());
    assert!(matches!(
        session.commit(),
        Err(SessionError::InvalidTransition { .. })
    ));
    assert!(matches!(
        session.apply_input(Field::EventName, "x"),
        Err(SessionError::InvalidTransition { .. })
    ));
    session.begin_edit().unwrap();
    assert!(matches!(
        session.begin_edit(),
        Err(SessionError::InvalidTransition { .. })
    ));
}

#[test]
fn out_of_range_rows_leave_the_working_copy_alone() {
    let mut session = EditSession::new(loaded_ledger());
    session.begin_edit().unwrap();
    let before = session.current().clone();
    let err = session.apply_input(Field::ShareAmount(5), "10").unwrap_err();
    assert!(matches!(err, SessionError::Ledger(_)));
    assert_eq!(session.current(), &before);
}

#[test]
fn new_statement_replaces_a_loaded_one() {
    let mut session = EditSession::new(loaded_ledger());
    session.new_ledger(EventLedger::template(today(), "Casa"));
    assert!(session.is_editing());
    assert_eq!(session.committed().event.name, "Novo Evento");
    assert_eq!(session.current().shares[1].beneficiary, "Casa");
}

const DECIMAL_MAX: &str = "79228162514264337593543950335";

#[test]
fn gross_beyond_the_decimal_range_is_an_error_not_a_crash() {
    let mut session = EditSession::new(EventLedger::template(today(), DEFAULT_PARTNER_NAME));
    session.begin_edit().unwrap();
    session.apply_input(Field::RevenueGross(0), DECIMAL_MAX).unwrap();
    let before = session.current().clone();

    let err = session
        .apply_input(Field::RevenueGross(1), DECIMAL_MAX)
        .unwrap_err();
    assert!(matches!(err, SessionError::Ledger(LedgerError::Overflow(_))));
    assert_eq!(session.current(), &before);
    assert!(session.is_editing());
}

#[test]
fn percentage_beyond_the_decimal_range_is_an_error_not_a_crash() {
    let mut session = EditSession::new(EventLedger::template(today(), DEFAULT_PARTNER_NAME));
    session.begin_edit().unwrap();
    session.apply_input(Field::RevenueGross(0), "1000").unwrap();
    let before = session.current().clone();

    let err = session
        .apply_input(Field::SharePercentage(0), DECIMAL_MAX)
        .unwrap_err();
    assert!(matches!(err, SessionError::Ledger(LedgerError::Overflow(_))));
    assert_eq!(session.current(), &before);
}

#[test]
fn en_us_input_is_read_with_the_point_separator() {
    let mut session = EditSession::new(loaded_ledger());
    session.begin_edit().unwrap();
    session
        .apply_input_in(Field::RevenueGross(1), "R$ 1,234.56", &LocaleConfig::from_tag("en-US"))
        .unwrap();
    assert_eq!(session.current().revenues[1].gross, dec!(1234.56));
    assert_eq!(session.current().total_gross, dec!(3234.56));
}
