//! Phase 1 tests: Data structures, indexes, store + file format.

use qna_hub::format::{SnapshotReader, SnapshotWriter};
use qna_hub::index::{AuthorIndex, CategoryIndex, TemporalIndex};
use qna_hub::store::{ContentStore, MemoryStore, QuestionScan, Snapshot, ViewerStore};
use qna_hub::types::header::FileHeader;
use qna_hub::types::{
    Difficulty, InterviewType, QnaError, Question, QuestionBuilder, QuestionPatch, SortOrder,
    Viewer, VoteDirection, FORMAT_VERSION, MAX_LABEL_SIZE, MAX_TEXT_SIZE, QNAH_MAGIC,
};

use tempfile::NamedTempFile;

// ==================== Helper ====================

fn question_at(author: u64, company: &str, category: &str, ts: u64) -> Question {
    QuestionBuilder::new(author, format!("Question from {company}"), "Some answer")
        .company(company)
        .category(category)
        .created_at(ts)
        .build()
}

fn store_with_questions(n: u64) -> MemoryStore {
    let store = MemoryStore::new();
    let author = store.insert_viewer(Viewer::new("alice").unwrap()).unwrap();
    for i in 0..n {
        let category = if i % 2 == 0 { "arrays" } else { "graphs" };
        store
            .insert_question(question_at(author.id, "Acme", category, 1_000 + i))
            .unwrap();
    }
    store
}

// ==================== Data Structure Tests ====================

#[test]
fn test_interview_type_names() {
    for it in [
        InterviewType::Technical,
        InterviewType::Behavioral,
        InterviewType::SystemDesign,
        InterviewType::Coding,
        InterviewType::CaseStudy,
    ] {
        assert_eq!(InterviewType::from_name(it.name()), Some(it));
    }
    assert_eq!(
        InterviewType::from_name("System-Design"),
        Some(InterviewType::SystemDesign)
    );
    assert!(InterviewType::from_name("phone-screen").is_none());
    assert!("phone-screen".parse::<InterviewType>().is_err());
}

#[test]
fn test_difficulty_and_sort_names() {
    assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    assert_eq!(SortOrder::from_name("votes"), Some(SortOrder::Votes));
    assert_eq!(SortOrder::default(), SortOrder::Newest);
    assert!(matches!(
        "popular".parse::<SortOrder>(),
        Err(QnaError::Validation(_))
    ));
}

#[test]
fn test_question_builder() {
    let q = QuestionBuilder::new(7, "  What is a B-tree?  ", "A balanced tree")
        .company(" Acme ")
        .category("databases")
        .interview_type(InterviewType::Coding)
        .difficulty(Difficulty::Hard)
        .created_at(42)
        .build();

    assert_eq!(q.id, 0);
    assert_eq!(q.author, 7);
    assert_eq!(q.question, "What is a B-tree?");
    assert_eq!(q.company, "Acme");
    assert_eq!(q.interview_type, InterviewType::Coding);
    assert_eq!(q.difficulty, Difficulty::Hard);
    assert_eq!(q.votes, 0);
    assert_eq!(q.views, 0);
    assert_eq!(q.created_at, 42);
    assert_eq!(q.updated_at, 42);
    assert!(q.answers.is_empty());
    assert!(q.validate().is_ok());
}

#[test]
fn test_question_validation() {
    let missing_company = QuestionBuilder::new(1, "q", "a").category("c").build();
    assert!(matches!(
        missing_company.validate(),
        Err(QnaError::Validation(_))
    ));

    let long_label = QuestionBuilder::new(1, "q", "a")
        .company("x".repeat(MAX_LABEL_SIZE + 1))
        .category("c")
        .build();
    assert!(long_label.validate().is_err());

    let long_text = QuestionBuilder::new(1, "q".repeat(MAX_TEXT_SIZE + 1), "a")
        .company("Acme")
        .category("c")
        .build();
    assert!(long_text.validate().is_err());
}

#[test]
fn test_search_is_case_insensitive() {
    let q = question_at(1, "Acme", "arrays", 1);
    assert!(q.matches_search("question from acme"));
    assert!(q.matches_search(""));
    assert!(!q.matches_search("globex"));
}

#[test]
fn test_question_patch() {
    let mut q = question_at(1, "Acme", "arrays", 1);
    assert!(QuestionPatch::default().is_empty());

    let patch = QuestionPatch {
        company: Some("Globex".into()),
        difficulty: Some(Difficulty::Easy),
        ..Default::default()
    };
    assert!(!patch.is_empty());
    patch.apply(&mut q).unwrap();
    assert_eq!(q.company, "Globex");
    assert_eq!(q.difficulty, Difficulty::Easy);
    assert!(q.updated_at > q.created_at);

    let blank = QuestionPatch {
        question: Some("   ".into()),
        ..Default::default()
    };
    assert!(blank.apply(&mut q).is_err());
}

#[test]
fn test_viewer_votes_stay_disjoint() {
    let mut viewer = Viewer::new("bob").unwrap();
    assert_eq!(viewer.vote_on(1), None);

    viewer.set_vote(1, Some(VoteDirection::Up));
    assert_eq!(viewer.vote_on(1), Some(VoteDirection::Up));

    viewer.set_vote(1, Some(VoteDirection::Down));
    assert!(!viewer.upvoted.contains(&1));
    assert!(viewer.downvoted.contains(&1));

    viewer.set_vote(1, None);
    assert!(viewer.upvoted.is_empty());
    assert!(viewer.downvoted.is_empty());
}

#[test]
fn test_viewer_username_required() {
    assert!(Viewer::new("   ").is_err());
    assert!(Viewer::new(&"u".repeat(MAX_LABEL_SIZE + 1)).is_err());
    assert_eq!(Viewer::new("  carol ").unwrap().username, "carol");
}

#[test]
fn test_vote_direction() {
    assert_eq!(VoteDirection::Up.sign(), 1);
    assert_eq!(VoteDirection::Down.sign(), -1);
    assert_eq!(VoteDirection::Up.to_string(), "up");
}

#[test]
fn test_error_classification() {
    assert!(QnaError::QuestionNotFound(1).is_not_found());
    assert!(QnaError::ViewerNotFound(1).is_not_found());
    assert!(!QnaError::Validation("x".into()).is_not_found());

    let conflict = QnaError::VersionConflict {
        entity: "question",
        id: 3,
    };
    assert!(conflict.is_retryable());
    assert_eq!(conflict.http_status(), 409);
    assert_eq!(QnaError::QuestionNotFound(1).http_status(), 404);
    assert_eq!(QnaError::InvalidCursor("x".into()).http_status(), 400);
    assert_eq!(QnaError::StoreUnavailable("x".into()).http_status(), 503);
    assert_eq!(QnaError::Truncated.http_status(), 500);
}

// ==================== Index Tests ====================

#[test]
fn test_category_index() {
    let mut index = CategoryIndex::new();
    let mut a = question_at(1, "Acme", "arrays", 1);
    a.id = 3;
    let mut b = question_at(1, "Acme", "graphs", 2);
    b.id = 1;
    let mut c = question_at(1, "Acme", "arrays", 3);
    c.id = 2;
    index.rebuild(&[a, b, c]);

    let arrays = vec!["arrays".to_string()];
    let graphs = vec!["graphs".to_string()];
    assert_eq!(index.get_any(&arrays), vec![2, 3]);
    assert_eq!(index.get_any(&graphs), vec![1]);
    assert_eq!(index.categories(), vec!["arrays", "graphs"]);

    let wanted = vec!["graphs".to_string(), "arrays".to_string()];
    assert_eq!(index.get_any(&wanted), vec![1, 2, 3]);

    index.remove(1, "graphs");
    assert_eq!(index.categories(), vec!["arrays"]);
    assert!(index.get_any(&graphs).is_empty());

    let mut d = question_at(1, "Acme", "arrays", 4);
    d.id = 0;
    index.add(&d);
    assert_eq!(index.get_any(&arrays), vec![0, 2, 3]);
}

#[test]
fn test_author_index() {
    let mut index = AuthorIndex::new();
    let mut a = question_at(5, "Acme", "arrays", 1);
    a.id = 2;
    let mut b = question_at(5, "Acme", "arrays", 2);
    b.id = 1;
    let mut c = question_at(6, "Acme", "arrays", 3);
    c.id = 3;
    index.rebuild(&[a, b, c]);

    assert_eq!(index.get(5), &[1, 2]);
    assert_eq!(index.author_count(), 2);

    index.remove(3, 6);
    assert_eq!(index.author_count(), 1);
    assert!(index.get(6).is_empty());
}

#[test]
fn test_temporal_index() {
    let mut index = TemporalIndex::new();
    let mut questions = Vec::new();
    for (id, ts) in [(1, 100), (2, 300), (3, 200), (4, 300)] {
        let mut q = question_at(1, "Acme", "arrays", ts);
        q.id = id;
        questions.push(q);
    }
    index.rebuild(&questions);

    let newest: Vec<u64> = index.newest_after(None).take(2).collect();
    assert_eq!(newest, vec![4, 2]);

    let after: Vec<u64> = index.newest_after(Some((300, 2))).collect();
    assert_eq!(after, vec![3, 1]);

    index.remove(2, 300);
    let all: Vec<u64> = index.newest_after(None).collect();
    assert_eq!(all, vec![4, 3, 1]);
}

// ==================== Store Tests ====================

#[test]
fn test_store_assigns_ids() {
    let store = store_with_questions(3);
    assert_eq!(store.question_count().unwrap(), 3);
    assert!(store.find_question(1).unwrap().is_some());
    assert!(store.find_question(3).unwrap().is_some());
    assert!(store.find_question(4).unwrap().is_none());

    let ids: Vec<u64> = store
        .find_questions_by_ids(&[3, 99, 1])
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(ids, vec![3, 1]);
}

#[test]
fn test_store_rejects_invalid_question() {
    let store = MemoryStore::new();
    let q = QuestionBuilder::new(1, "", "a")
        .company("Acme")
        .category("c")
        .build();
    assert!(matches!(
        store.insert_question(q),
        Err(QnaError::Validation(_))
    ));
}

#[test]
fn test_store_compare_and_swap() {
    let store = store_with_questions(1);
    let first = store.find_question(1).unwrap().unwrap();
    let second = first.clone();

    let mut edited = first;
    edited.votes = 5;
    let saved = store.save_question(&edited).unwrap();
    assert_eq!(saved.version, 1);

    let mut stale = second;
    stale.votes = 9;
    assert!(matches!(
        store.save_question(&stale),
        Err(QnaError::VersionConflict {
            entity: "question",
            id: 1
        })
    ));
    assert_eq!(store.find_question(1).unwrap().unwrap().votes, 5);
}

#[test]
fn test_store_reindexes_category_on_save() {
    let store = store_with_questions(2);
    let mut q = store.find_question(1).unwrap().unwrap();
    assert_eq!(q.category, "arrays");
    q.category = "strings".into();
    store.save_question(&q).unwrap();

    assert_eq!(store.categories().unwrap(), vec!["graphs", "strings"]);
}

#[test]
fn test_store_delete() {
    let store = store_with_questions(2);
    assert!(store.delete_question(1).unwrap());
    assert!(!store.delete_question(1).unwrap());
    assert_eq!(store.categories().unwrap(), vec!["graphs"]);
    let next = store
        .insert_question(question_at(1, "Acme", "arrays", 5_000))
        .unwrap();
    assert_eq!(next.id, 3);
}

#[test]
fn test_store_scan_filters() {
    let store = store_with_questions(6);
    let mut scan = QuestionScan::new(SortOrder::Newest, 10);
    scan.categories.insert("graphs".into());
    let found = store.find_questions(&scan).unwrap();
    let ids: Vec<u64> = found.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![6, 4, 2]);

    let mut scan = QuestionScan::new(SortOrder::Votes, 2);
    scan.search = "acme".into();
    assert_eq!(store.find_questions(&scan).unwrap().len(), 2);

    let mut scan = QuestionScan::new(SortOrder::Company, 10);
    scan.search = "globex".into();
    assert!(store.find_questions(&scan).unwrap().is_empty());
}

#[test]
fn test_viewer_usernames_unique() {
    let store = MemoryStore::new();
    let alice = store.insert_viewer(Viewer::new("Alice").unwrap()).unwrap();
    assert_eq!(alice.id, 1);
    assert!(matches!(
        store.insert_viewer(Viewer::new("alice").unwrap()),
        Err(QnaError::Validation(_))
    ));
    let found = store.find_viewer_by_username("ALICE").unwrap().unwrap();
    assert_eq!(found.id, alice.id);
}

#[test]
fn test_viewer_compare_and_swap() {
    let store = MemoryStore::new();
    let viewer = store.insert_viewer(Viewer::new("dave").unwrap()).unwrap();

    let mut a = viewer.clone();
    a.bookmarks.insert(1);
    store.save_viewer(&a).unwrap();

    let mut b = viewer;
    b.bookmarks.insert(2);
    assert!(matches!(
        store.save_viewer(&b),
        Err(QnaError::VersionConflict { entity: "viewer", .. })
    ));

    let mut renamed = store.find_viewer(1).unwrap().unwrap();
    renamed.username = "eve".into();
    assert!(store.save_viewer(&renamed).is_err());
}

#[test]
fn test_from_snapshot_rejects_overlapping_votes() {
    let mut viewer = Viewer::new("frank").unwrap();
    viewer.id = 1;
    viewer.upvoted.insert(4);
    viewer.downvoted.insert(4);
    let snapshot = Snapshot {
        viewers: vec![viewer],
        ..Default::default()
    };
    assert!(MemoryStore::from_snapshot(snapshot).is_err());
}

#[test]
fn test_from_snapshot_rejects_duplicate_ids() {
    let mut first = question_at(1, "Acme", "arrays", 10);
    first.id = 3;
    let mut second = question_at(1, "Globex", "graphs", 20);
    second.id = 3;
    let snapshot = Snapshot {
        questions: vec![first, second],
        ..Default::default()
    };
    assert!(matches!(
        MemoryStore::from_snapshot(snapshot),
        Err(QnaError::Corrupt(_))
    ));

    let mut ann = Viewer::new("ann").unwrap();
    ann.id = 2;
    let mut bob = Viewer::new("bob").unwrap();
    bob.id = 2;
    let snapshot = Snapshot {
        viewers: vec![ann, bob],
        ..Default::default()
    };
    assert!(matches!(
        MemoryStore::from_snapshot(snapshot),
        Err(QnaError::Corrupt(_))
    ));
}

// ==================== File Format Tests ====================

#[test]
fn test_header_roundtrip() {
    let header = FileHeader::new(3, 2, 99);
    let mut buf = Vec::new();
    header.write_to(&mut buf).unwrap();
    assert_eq!(buf.len(), 32);
    assert_eq!(&buf[..4], &QNAH_MAGIC);

    let back = FileHeader::read_from(&mut buf.as_slice()).unwrap();
    assert_eq!(back, header);
    assert_eq!(back.version, FORMAT_VERSION);
}

#[test]
fn test_snapshot_file_roundtrip() {
    let store = store_with_questions(4);
    let mut viewer = store.find_viewer(1).unwrap().unwrap();
    viewer.set_vote(2, Some(VoteDirection::Up));
    viewer.bookmarks.insert(3);
    store.save_viewer(&viewer).unwrap();

    let tmp = NamedTempFile::new().unwrap();
    SnapshotWriter::write_store(&store, tmp.path()).unwrap();
    let loaded = SnapshotReader::read_store(tmp.path()).unwrap();

    assert_eq!(loaded.question_count().unwrap(), 4);
    assert_eq!(loaded.viewer_count().unwrap(), 1);
    assert_eq!(
        loaded.find_question(2).unwrap(),
        store.find_question(2).unwrap()
    );
    let back = loaded.find_viewer(1).unwrap().unwrap();
    assert_eq!(back.vote_on(2), Some(VoteDirection::Up));
    assert!(back.has_bookmark(3));
    assert_eq!(loaded.categories().unwrap(), vec!["arrays", "graphs"]);

    let next = loaded
        .insert_question(question_at(1, "Acme", "arrays", 9_000))
        .unwrap();
    assert_eq!(next.id, 5);
}

#[test]
fn test_empty_snapshot() {
    let mut buf = Vec::new();
    SnapshotWriter::write_to(&Snapshot::default(), &mut buf).unwrap();
    let snapshot = SnapshotReader::read_from(&mut buf.as_slice()).unwrap();
    assert!(snapshot.questions.is_empty());

    let store = MemoryStore::from_snapshot(snapshot).unwrap();
    let viewer = store.insert_viewer(Viewer::new("gina").unwrap()).unwrap();
    assert_eq!(viewer.id, 1);
}

#[test]
fn test_invalid_magic() {
    let mut buf = Vec::new();
    SnapshotWriter::write_to(&Snapshot::default(), &mut buf).unwrap();
    buf[0] = b'X';
    assert!(matches!(
        SnapshotReader::read_from(&mut buf.as_slice()),
        Err(QnaError::InvalidMagic)
    ));
}

#[test]
fn test_unsupported_version() {
    let mut buf = Vec::new();
    SnapshotWriter::write_to(&Snapshot::default(), &mut buf).unwrap();
    buf[4..8].copy_from_slice(&99u32.to_le_bytes());
    assert!(matches!(
        SnapshotReader::read_from(&mut buf.as_slice()),
        Err(QnaError::UnsupportedVersion(99))
    ));
}

#[test]
fn test_truncated_file() {
    let empty: Vec<u8> = Vec::new();
    assert!(matches!(
        SnapshotReader::read_from(&mut empty.as_slice()),
        Err(QnaError::Truncated)
    ));

    let store = store_with_questions(3);
    let mut buf = Vec::new();
    SnapshotWriter::write_to(&store.snapshot().unwrap(), &mut buf).unwrap();
    buf.truncate(buf.len() - 1);
    assert!(matches!(
        SnapshotReader::read_from(&mut buf.as_slice()),
        Err(QnaError::Truncated)
    ));
}

#[test]
fn test_duplicate_question_ids_in_file_are_corrupt() {
    let mut question = question_at(1, "Acme", "arrays", 10);
    question.id = 1;
    let snapshot = Snapshot {
        next_question_id: 2,
        questions: vec![question.clone(), question],
        ..Default::default()
    };
    let tmp = NamedTempFile::new().unwrap();
    SnapshotWriter::write_to_file(&snapshot, tmp.path()).unwrap();

    // Header counts agree with the payload, so only the load catches it.
    assert_eq!(
        SnapshotReader::read_from_file(tmp.path())
            .unwrap()
            .questions
            .len(),
        2
    );
    assert!(matches!(
        SnapshotReader::read_store(tmp.path()),
        Err(QnaError::Corrupt(_))
    ));
}

#[test]
fn test_count_mismatch_is_corrupt() {
    let store = store_with_questions(2);
    let mut buf = Vec::new();
    SnapshotWriter::write_to(&store.snapshot().unwrap(), &mut buf).unwrap();
    buf[8..16].copy_from_slice(&7u64.to_le_bytes());
    assert!(matches!(
        SnapshotReader::read_from(&mut buf.as_slice()),
        Err(QnaError::Corrupt(_))
    ));
}
