// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    MONDAY, always_schedule, create_test_clock, create_test_registry, create_test_seller,
    local_instant, time,
};
use crate::{
    CoreError, FallbackPolicy, RankKey, SelectionPolicy, SellerRegistry, assign, select_seller,
};
use chrono::{DateTime, Utc};
use cocolu_audit::{AssignmentEvent, AssignmentEventKind};
use cocolu_domain::{
    BusinessClock, ConversationId, DomainError, Seller, SellerId, SellerStatus, Specialty,
    UnavailableReason, WorkSchedule, is_available_now,
};

fn select<'a>(
    sellers: &'a [Seller],
    requested: Option<&str>,
    now: DateTime<Utc>,
    policy: &SelectionPolicy,
) -> Option<&'a Seller> {
    let clock: BusinessClock = create_test_clock();
    let specialty: Option<Specialty> = requested.map(Specialty::new);
    select_seller(sellers, specialty.as_ref(), now, &clock, policy)
}

fn ids(selected: Option<&Seller>) -> Option<&str> {
    selected.map(|s| s.id.as_str())
}

#[test]
fn test_lowest_load_wins() {
    let mut busy: Seller = create_test_seller(1);
    busy.current_clients = 3;
    let mut light: Seller = create_test_seller(2);
    light.current_clients = 1;
    let sellers: Vec<Seller> = vec![busy, light];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let selected: Option<&Seller> = select(&sellers, None, now, &SelectionPolicy::default());

    assert_eq!(ids(selected), Some("SELLER002"));
}

#[test]
fn test_load_is_compared_as_percentage() {
    // 2 of 10 (20%) beats 1 of 2 (50%).
    let mut small: Seller = create_test_seller(1);
    small.max_clients = 2;
    small.current_clients = 1;
    let mut large: Seller = create_test_seller(2);
    large.max_clients = 10;
    large.current_clients = 2;
    let sellers: Vec<Seller> = vec![small, large];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let selected: Option<&Seller> = select(&sellers, None, now, &SelectionPolicy::default());

    assert_eq!(ids(selected), Some("SELLER002"));
}

#[test]
fn test_rating_breaks_load_ties() {
    let mut low: Seller = create_test_seller(1);
    low.rating = 3.5;
    let mut high: Seller = create_test_seller(2);
    high.rating = 4.8;
    let sellers: Vec<Seller> = vec![low, high];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let selected: Option<&Seller> = select(&sellers, None, now, &SelectionPolicy::default());

    assert_eq!(ids(selected), Some("SELLER002"));
}

#[test]
fn test_registration_breaks_remaining_ties() {
    let sellers: Vec<Seller> = vec![create_test_seller(3), create_test_seller(2)];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let selected: Option<&Seller> = select(&sellers, None, now, &SelectionPolicy::default());

    assert_eq!(ids(selected), Some("SELLER002"));
}

#[test]
fn test_rating_first_ranking_order() {
    let mut loaded_star: Seller = create_test_seller(1);
    loaded_star.current_clients = 3;
    loaded_star.rating = 5.0;
    let mut idle_rookie: Seller = create_test_seller(2);
    idle_rookie.rating = 3.0;
    let sellers: Vec<Seller> = vec![loaded_star, idle_rookie];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);
    let policy: SelectionPolicy = SelectionPolicy {
        ranking: vec![RankKey::Rating, RankKey::Load],
        ..SelectionPolicy::default()
    };

    assert_eq!(
        ids(select(&sellers, None, now, &SelectionPolicy::default())),
        Some("SELLER002")
    );
    assert_eq!(ids(select(&sellers, None, now, &policy)), Some("SELLER001"));
}

#[test]
fn test_selection_is_deterministic() {
    let sellers: Vec<Seller> = (1..=5).map(create_test_seller).collect();
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);
    let policy: SelectionPolicy = SelectionPolicy::default();

    let first: Option<&Seller> = select(&sellers, None, now, &policy);
    for _ in 0..10 {
        assert_eq!(select(&sellers, None, now, &policy), first);
    }
}

#[test]
fn test_selected_seller_is_always_available() {
    let mut offline: Seller = create_test_seller(1);
    offline.status = SellerStatus::Offline;
    let mut full: Seller = create_test_seller(2);
    full.current_clients = full.max_clients;
    let mut weekend: Seller = create_test_seller(3);
    weekend.work_schedule = WorkSchedule::uniform(&[0, 6], time("09:00"), time("17:00")).unwrap();
    let mut ok: Seller = create_test_seller(4);
    ok.current_clients = 4;
    let sellers: Vec<Seller> = vec![offline, full, weekend, ok];
    let clock: BusinessClock = create_test_clock();

    for hour in [8, 9, 12, 16, 17, 20] {
        let now: DateTime<Utc> = local_instant(MONDAY, hour, 0);
        if let Some(seller) = select(&sellers, None, now, &SelectionPolicy::default()) {
            assert!(is_available_now(seller, now, &clock).is_available());
            assert!(seller.current_clients < seller.max_clients);
        }
    }
}

#[test]
fn test_nobody_available_returns_none() {
    let sellers: Vec<Seller> = vec![create_test_seller(1)];
    let now: DateTime<Utc> = local_instant(MONDAY, 22, 0);

    assert!(select(&sellers, None, now, &SelectionPolicy::default()).is_none());
    assert!(select(&[], None, now, &SelectionPolicy::default()).is_none());
}

#[test]
fn test_general_request_does_not_filter() {
    let mut specialist: Seller = create_test_seller(1);
    specialist.specialty = Specialty::new("rings");
    let sellers: Vec<Seller> = vec![specialist];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let selected: Option<&Seller> =
        select(&sellers, Some("general"), now, &SelectionPolicy::default());

    assert_eq!(ids(selected), Some("SELLER001"));
}

#[test]
fn test_specialist_preferred_over_lighter_generalist() {
    let mut specialist: Seller = create_test_seller(1);
    specialist.specialty = Specialty::new("rings");
    specialist.current_clients = 4;
    let sellers: Vec<Seller> = vec![specialist, create_test_seller(2)];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let selected: Option<&Seller> =
        select(&sellers, Some("Rings"), now, &SelectionPolicy::default());

    assert_eq!(ids(selected), Some("SELLER001"));
}

fn fallback_policy(fallback: FallbackPolicy) -> SelectionPolicy {
    SelectionPolicy {
        fallback,
        ..SelectionPolicy::default()
    }
}

#[test]
fn test_fallback_policies_when_specialist_is_busy() {
    let mut specialist: Seller = create_test_seller(1);
    specialist.specialty = Specialty::new("rings");
    specialist.current_clients = specialist.max_clients;
    let sellers: Vec<Seller> = vec![specialist, create_test_seller(2)];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let always = select(&sellers, Some("rings"), now, &fallback_policy(FallbackPolicy::Always));
    let absent = select(
        &sellers,
        Some("rings"),
        now,
        &fallback_policy(FallbackPolicy::OnlyWhenAbsent),
    );
    let never = select(&sellers, Some("rings"), now, &fallback_policy(FallbackPolicy::Never));

    assert_eq!(ids(always), Some("SELLER002"));
    assert_eq!(ids(absent), None);
    assert_eq!(ids(never), None);
}

#[test]
fn test_fallback_policies_when_specialist_is_absent() {
    let mut retired: Seller = create_test_seller(1);
    retired.specialty = Specialty::new("rings");
    retired.status = SellerStatus::Offline;
    let sellers: Vec<Seller> = vec![retired, create_test_seller(2)];
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let absent = select(
        &sellers,
        Some("rings"),
        now,
        &fallback_policy(FallbackPolicy::OnlyWhenAbsent),
    );
    let never = select(&sellers, Some("rings"), now, &fallback_policy(FallbackPolicy::Never));

    assert_eq!(ids(absent), Some("SELLER002"));
    assert_eq!(ids(never), None);
}

#[test]
fn test_fallback_policy_parsing() {
    assert_eq!("always".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Always));
    assert_eq!(
        "only-when-absent".parse::<FallbackPolicy>(),
        Ok(FallbackPolicy::OnlyWhenAbsent)
    );
    assert_eq!(
        "ONLY_WHEN_ABSENT".parse::<FallbackPolicy>(),
        Ok(FallbackPolicy::OnlyWhenAbsent)
    );
    assert_eq!("never".parse::<FallbackPolicy>(), Ok(FallbackPolicy::Never));
    assert_eq!(
        "sometimes".parse::<FallbackPolicy>(),
        Err(DomainError::InvalidFallbackPolicy(String::from("sometimes")))
    );
}

#[test]
fn test_rank_order_parsing() {
    assert_eq!(
        RankKey::parse_order("rating, load").unwrap(),
        vec![RankKey::Rating, RankKey::Load]
    );
    assert!(RankKey::parse_order("").is_err());
    assert!(RankKey::parse_order("load,load").is_err());
    assert!(RankKey::parse_order("load,speed").is_err());
}

#[test]
fn test_assign_commits_load_and_event() {
    let mut registry: SellerRegistry = create_test_registry(vec![create_test_seller(1)]);
    let id: SellerId = SellerId::from_number(1);
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);

    let event: AssignmentEvent = assign(
        &mut registry,
        &id,
        ConversationId::new("chat-1"),
        Some(Specialty::new("rings")),
        now,
        &create_test_clock(),
    )
    .unwrap();

    assert_eq!(registry.get_seller(&id).unwrap().current_clients, 1);
    assert_eq!(event.kind, AssignmentEventKind::Assigned);
    assert_eq!(event.seller_id, id);
    assert_eq!(event.timestamp, now);
    assert_eq!(event.specialty_requested, Some(Specialty::new("rings")));
}

#[test]
fn test_assign_revalidates_capacity_at_commit() {
    let mut registry: SellerRegistry = create_test_registry(vec![create_test_seller(1)]);
    let id: SellerId = SellerId::from_number(1);
    let now: DateTime<Utc> = local_instant(MONDAY, 10, 0);
    let clock: BusinessClock = create_test_clock();

    // Selected while there was room...
    let sellers: Vec<Seller> = registry.get_all_sellers();
    let selected: SellerId = select(&sellers, None, now, &SelectionPolicy::default())
        .unwrap()
        .id
        .clone();
    // ...then filled up before commit.
    for _ in 0..5 {
        registry.increment_load(&id).unwrap();
    }

    let result: Result<AssignmentEvent, CoreError> = assign(
        &mut registry,
        &selected,
        ConversationId::new("chat-1"),
        None,
        now,
        &clock,
    );

    assert_eq!(
        result,
        Err(CoreError::CapacityExceeded {
            seller_id: id.clone(),
            current: 5,
            max: 5,
        })
    );
    assert_eq!(registry.get_seller(&id).unwrap().current_clients, 5);
}

#[test]
fn test_assign_revalidates_availability_at_commit() {
    let mut seller: Seller = create_test_seller(1);
    seller.work_schedule = always_schedule();
    let mut registry: SellerRegistry = create_test_registry(vec![seller]);
    let id: SellerId = SellerId::from_number(1);
    registry.update_seller_status(&id, "offline").unwrap();

    let result: Result<AssignmentEvent, CoreError> = assign(
        &mut registry,
        &id,
        ConversationId::new("chat-1"),
        None,
        local_instant(MONDAY, 10, 0),
        &create_test_clock(),
    );

    assert_eq!(
        result,
        Err(CoreError::SellerUnavailable {
            seller_id: id.clone(),
            reason: UnavailableReason::Offline,
        })
    );
    assert_eq!(registry.get_seller(&id).unwrap().current_clients, 0);
}
