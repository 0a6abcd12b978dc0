//! Criterion benchmarks for QnA Hub.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use tempfile::NamedTempFile;

use qna_hub::config::FlipDelta;
use qna_hub::engine::{EngagementEngine, ListingFilter, ListingQuery, ViewProjector};
use qna_hub::format::{SnapshotReader, SnapshotWriter};
use qna_hub::store::{MemoryStore, Snapshot};
use qna_hub::types::{Question, QuestionBuilder, SortOrder, Viewer};

const COMPANIES: [&str; 6] = ["Acme", "Globex", "Initech", "Hooli", "Umbrella", "Stark"];
const CATEGORIES: [&str; 5] = ["arrays", "graphs", "dp", "strings", "system-design"];

/// Build a large store from a snapshot for fast construction.
fn make_large_store(question_count: usize, viewer_count: usize) -> MemoryStore {
    let mut rng = rand::thread_rng();

    let mut viewers: Vec<Viewer> = Vec::with_capacity(viewer_count);
    for i in 0..viewer_count {
        let mut viewer = Viewer::new(&format!("viewer_{}", i)).unwrap();
        viewer.id = i as u64 + 1;
        viewers.push(viewer);
    }

    let mut questions: Vec<Question> = Vec::with_capacity(question_count);
    for i in 0..question_count {
        let text = if i % 10 == 0 {
            format!("Design a rate limiter, variant {}", i)
        } else {
            format!("Question number {}", i)
        };
        let mut q = QuestionBuilder::new(rng.gen_range(1..=viewer_count as u64), text, "answer")
            .company(COMPANIES[i % COMPANIES.len()])
            .category(CATEGORIES[i % CATEGORIES.len()])
            .created_at(1_000_000 + rng.gen_range(0..question_count as u64))
            .build();
        q.id = i as u64 + 1;
        q.votes = rng.gen_range(-20..200);
        questions.push(q);
    }

    for viewer in &mut viewers {
        for _ in 0..20 {
            let qid = rng.gen_range(1..=question_count as u64);
            if rng.gen_bool(0.8) {
                viewer.upvoted.insert(qid);
            } else if !viewer.upvoted.contains(&qid) {
                viewer.downvoted.insert(qid);
            }
            if rng.gen_bool(0.3) {
                viewer.bookmarks.insert(qid);
            }
        }
    }

    MemoryStore::from_snapshot(Snapshot {
        next_question_id: question_count as u64 + 1,
        next_viewer_id: viewer_count as u64 + 1,
        questions,
        viewers,
    })
    .unwrap()
}

fn bench_list_newest(c: &mut Criterion) {
    let store = make_large_store(100_000, 100);
    let query = ListingQuery::default();
    let filter = ListingFilter::new().page_size(20);

    c.bench_function("list_newest_100k", |b| {
        b.iter(|| {
            let _ = query.list(&store, &filter).unwrap();
        })
    });
}

fn bench_list_votes_category(c: &mut Criterion) {
    let store = make_large_store(100_000, 100);
    let query = ListingQuery::default();
    let filter = ListingFilter::new()
        .category("graphs")
        .sort(SortOrder::Votes)
        .page_size(20);

    c.bench_function("list_votes_category_100k", |b| {
        b.iter(|| {
            let _ = query.list(&store, &filter).unwrap();
        })
    });
}

fn bench_list_search_deep_page(c: &mut Criterion) {
    let store = make_large_store(100_000, 100);
    let query = ListingQuery::default();
    let filter = ListingFilter::new()
        .search("rate limiter")
        .sort(SortOrder::Company)
        .page_size(20);

    let mut page = query.list(&store, &filter).unwrap();
    for _ in 0..10 {
        let next = filter.next_page(page.next_cursor.as_deref());
        page = query.list(&store, &next).unwrap();
    }
    let deep = filter.next_page(page.next_cursor.as_deref());

    c.bench_function("list_search_page10_100k", |b| {
        b.iter(|| {
            let _ = query.list(&store, &deep).unwrap();
        })
    });
}

fn bench_project_page(c: &mut Criterion) {
    let store = make_large_store(100_000, 100);
    let query = ListingQuery::default();
    let projector = ViewProjector::new();
    let filter = ListingFilter::new().page_size(50);

    c.bench_function("project_page_50", |b| {
        b.iter(|| {
            let page = query.list(&store, &filter).unwrap();
            let _ = projector.project_page(&store, page, Some(7)).unwrap();
        })
    });
}

fn bench_toggle_upvote(c: &mut Criterion) {
    let store = make_large_store(10_000, 1_000);
    let engine = EngagementEngine::new(FlipDelta::Single, 3);

    c.bench_function("toggle_upvote_10k", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let qid = rng.gen_range(1..=10_000u64);
            let vid = rng.gen_range(1..=1_000u64);
            let _ = engine.toggle_upvote(&store, qid, vid).unwrap();
        })
    });
}

fn bench_toggle_bookmark(c: &mut Criterion) {
    let store = make_large_store(10_000, 1_000);
    let engine = EngagementEngine::default();

    c.bench_function("toggle_bookmark_10k", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let qid = rng.gen_range(1..=10_000u64);
            let vid = rng.gen_range(1..=1_000u64);
            let _ = engine.toggle_bookmark(&store, qid, vid).unwrap();
        })
    });
}

fn bench_write_file_10k(c: &mut Criterion) {
    let store = make_large_store(10_000, 1_000);
    let snapshot = store.snapshot().unwrap();

    c.bench_function("write_file_10k", |b| {
        b.iter(|| {
            let tmp = NamedTempFile::new().unwrap();
            SnapshotWriter::write_to_file(&snapshot, tmp.path()).unwrap();
        })
    });
}

fn bench_read_file_10k(c: &mut Criterion) {
    let store = make_large_store(10_000, 1_000);
    let tmp = NamedTempFile::new().unwrap();
    SnapshotWriter::write_store(&store, tmp.path()).unwrap();

    c.bench_function("read_file_10k", |b| {
        b.iter(|| {
            let _ = SnapshotReader::read_store(tmp.path()).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_list_newest,
    bench_list_votes_category,
    bench_list_search_deep_page,
    bench_project_page,
    bench_toggle_upvote,
    bench_toggle_bookmark,
    bench_write_file_10k,
    bench_read_file_10k,
);

criterion_main!(benches);
