use super::Identity;

#[test]
fn it_generates_identifiers_once() {
    let mut identity = Identity::default();
    let (first_user, first_session) = identity.resolve("", "");
    let (second_user, second_session) = identity.resolve("", "");

    assert!(!first_user.is_empty());
    assert!(!first_session.is_empty());
    assert_eq!(first_user, second_user);
    assert_eq!(first_session, second_session);
}

#[test]
fn it_lets_overrides_win_for_the_current_request() {
    let mut identity = Identity::default();
    let (user_id, session_id) = identity.resolve("surveyor-7", "site-42");
    assert_eq!(user_id, "surveyor-7");
    assert_eq!(session_id, "site-42");
}

#[test]
fn it_does_not_store_user_overrides() {
    let mut identity = Identity::default();
    let (generated_user, _) = identity.resolve("", "");
    let _ = identity.resolve("surveyor-7", "");
    let (user_id, _) = identity.resolve("", "");
    assert_eq!(user_id, generated_user);
}

#[test]
fn it_stores_session_overrides() {
    let mut identity = Identity::default();
    let _ = identity.resolve("", "site-42");
    let (_, session_id) = identity.resolve("", "");
    assert_eq!(session_id, "site-42");
}

#[test]
fn it_regenerates_only_the_session_on_new_session() {
    let mut identity = Identity::default();
    let (user_before, session_before) = identity.resolve("", "");

    let new_session = identity.new_session();
    let (user_after, session_after) = identity.resolve("", "");

    assert_eq!(user_before, user_after);
    assert_eq!(session_after, new_session);
    assert_ne!(session_before, session_after);
}

#[test]
fn it_creates_distinct_ids() {
    assert_ne!(Identity::create_id(), Identity::create_id());
}
