use chrono::{Duration, TimeZone, Utc};
use tripplan_core::{
    Itinerary, ItineraryDraft, ItineraryRepository, OwnerKey, RepoError,
    SqliteItineraryRepository,
};

fn trip(title: &str, minutes_after: i64) -> Itinerary {
    let draft = ItineraryDraft::new(title, "2024-05-01", "2024-05-03");
    let range = draft.validate().unwrap();
    let created = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes_after);
    Itinerary::create(draft, range, created)
}

#[test]
fn list_is_ordered_by_creation_time() {
    let repo = SqliteItineraryRepository::open_in_memory().unwrap();
    let owner = OwnerKey::new("alice");

    let later = trip("Later", 30);
    let earlier = trip("Earlier", 0);
    repo.put(&later, &owner).unwrap();
    repo.put(&earlier, &owner).unwrap();

    let titles: Vec<String> = repo
        .list(&owner)
        .unwrap()
        .into_iter()
        .map(|itinerary| itinerary.title)
        .collect();
    assert_eq!(titles, vec!["Earlier", "Later"]);
}

#[test]
fn put_replaces_document_for_same_owner() {
    let repo = SqliteItineraryRepository::open_in_memory().unwrap();
    let owner = OwnerKey::new("alice");

    let mut itinerary = trip("Kyoto", 0);
    repo.put(&itinerary, &owner).unwrap();
    itinerary.title = "Kyoto in spring".to_string();
    itinerary.cover_image = Some("data:image/png;base64,AAAA".to_string());
    repo.put(&itinerary, &owner).unwrap();

    let loaded = repo.get(&itinerary.id, &owner).unwrap().unwrap();
    assert_eq!(loaded, itinerary);

    let title: String = repo
        .connection()
        .query_row(
            "SELECT title FROM itineraries WHERE id = ?1;",
            [itinerary.id.as_str()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(title, "Kyoto in spring");
}

#[test]
fn other_owners_cannot_see_or_touch_records() {
    let repo = SqliteItineraryRepository::open_in_memory().unwrap();
    let alice = OwnerKey::new("alice");
    let mallory = OwnerKey::new("mallory");

    let itinerary = trip("Kyoto", 0);
    repo.put(&itinerary, &alice).unwrap();

    assert!(repo.get(&itinerary.id, &mallory).unwrap().is_none());
    assert!(matches!(
        repo.put(&itinerary, &mallory),
        Err(RepoError::NotFound(_))
    ));
    assert!(matches!(
        repo.delete(&itinerary.id, &mallory),
        Err(RepoError::NotFound(_))
    ));
    assert_eq!(repo.list(&alice).unwrap(), vec![itinerary]);
}

#[test]
fn undecodable_document_is_reported_as_invalid_data() {
    let repo = SqliteItineraryRepository::open_in_memory().unwrap();
    let owner = OwnerKey::new("alice");
    let itinerary = trip("Kyoto", 0);
    repo.put(&itinerary, &owner).unwrap();

    repo.connection()
        .execute(
            "UPDATE itineraries SET document = '{\"id\": 1}' WHERE id = ?1;",
            [itinerary.id.as_str()],
        )
        .unwrap();

    assert!(matches!(
        repo.get(&itinerary.id, &owner),
        Err(RepoError::InvalidData(_))
    ));
    assert!(matches!(repo.list(&owner), Err(RepoError::InvalidData(_))));
}

#[test]
fn reopening_file_database_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips.sqlite3");
    let owner = OwnerKey::new("alice");
    let itinerary = trip("Kyoto", 0);

    SqliteItineraryRepository::open(&path)
        .unwrap()
        .put(&itinerary, &owner)
        .unwrap();

    let reopened = SqliteItineraryRepository::open(&path).unwrap();
    assert_eq!(reopened.get(&itinerary.id, &owner).unwrap(), Some(itinerary));
}

#[test]
fn put_refuses_update_timestamp_before_creation() {
    let repo = SqliteItineraryRepository::open_in_memory().unwrap();
    let owner = OwnerKey::new("alice");
    let mut itinerary = trip("Kyoto", 0);
    itinerary.updated_at = itinerary.created_at - Duration::days(1);

    assert!(matches!(
        repo.put(&itinerary, &owner),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.list(&owner).unwrap().is_empty());
}
