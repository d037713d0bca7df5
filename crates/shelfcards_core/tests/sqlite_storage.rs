use rusqlite::Connection;
use shelfcards_core::db::{open_db, open_db_in_memory, DbError};
use shelfcards_core::{
    LibraryStore, PersistenceAdapter, PersistenceError, SqliteStorage, StoreError,
    FLASHCARDS_KEY, SHELVES_KEY,
};

#[test]
fn storage_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStorage::try_new(&conn) {
        Err(DbError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn save_all_writes_every_entry() {
    let conn = open_db_in_memory().unwrap();
    let mut storage = SqliteStorage::try_new(&conn).unwrap();

    storage
        .save_all(&[(SHELVES_KEY, "[1]".to_string()), (FLASHCARDS_KEY, "[2]".to_string())])
        .unwrap();

    assert_eq!(storage.load(SHELVES_KEY).as_deref(), Some("[1]"));
    assert_eq!(storage.load(FLASHCARDS_KEY).as_deref(), Some("[2]"));
}

#[test]
fn failed_save_all_rolls_back_earlier_entries() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_flashcards BEFORE INSERT ON kv_entries
         WHEN NEW.key = 'flashcards'
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
    )
    .unwrap();
    let mut storage = SqliteStorage::try_new(&conn).unwrap();

    let result = storage.save_all(&[
        (SHELVES_KEY, "[]".to_string()),
        (FLASHCARDS_KEY, "[]".to_string()),
    ]);

    assert!(result.is_err());
    assert_eq!(storage.load(SHELVES_KEY), None);
}

#[test]
fn library_survives_reopening_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.sqlite3");

    let (shelves, cards) = {
        let conn = open_db(&path).unwrap();
        let mut store = LibraryStore::open(SqliteStorage::try_new(&conn).unwrap());
        let shelf = store.add_shelf("Astronomy").unwrap();
        store
            .add_card(&shelf.id, "Closest star?", "The Sun, then Proxima Centauri")
            .unwrap();
        let other = store.add_shelf("Botany").unwrap();
        store.add_card(&other.id, "Xylem?", "Water transport").unwrap();
        (store.shelves().to_vec(), store.flashcards().to_vec())
    };

    let conn = open_db(&path).unwrap();
    let store = LibraryStore::open(SqliteStorage::try_new(&conn).unwrap());

    assert_eq!(store.shelves(), shelves.as_slice());
    assert_eq!(store.flashcards(), cards.as_slice());
}

#[test]
fn unreadable_library_is_not_overwritten_by_next_mutation() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut store = LibraryStore::open(SqliteStorage::try_new(&conn).unwrap());
        let shelf = store.add_shelf("Geology").unwrap();
        store.add_card(&shelf.id, "Hardest mineral?", "Diamond").unwrap();
    }
    let storage = SqliteStorage::try_new(&conn).unwrap();
    conn.execute_batch("ALTER TABLE kv_entries RENAME TO kv_entries_moved;")
        .unwrap();

    let mut store = LibraryStore::open(storage);
    assert_eq!(store.shelf_count(), 0);
    let err = store.add_shelf("Fresh start").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Persistence(PersistenceError::Unavailable(_))
    ));
    assert!(store.is_dirty());

    conn.execute_batch("ALTER TABLE kv_entries_moved RENAME TO kv_entries;")
        .unwrap();
    let reopened = LibraryStore::open(SqliteStorage::try_new(&conn).unwrap());
    assert_eq!(reopened.shelves()[0].title, "Geology");
    assert_eq!(reopened.card_count(), 1);
}
