//! CLI command implementations.

use crate::config::HubConfig;
use crate::engine::{ListingFilter, QuestionHub, QuestionView};
use crate::format::{SnapshotReader, SnapshotWriter};
use crate::store::{ContentStore, MemoryStore, Snapshot};
use crate::types::{
    Difficulty, InterviewType, QnaError, QnaResult, Question, QuestionBuilder, QuestionId,
    QuestionPatch, ViewerId, VoteDirection,
};

/// Which of a viewer's question lists to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineKind {
    Posted,
    Upvoted,
    Downvoted,
    Bookmarks,
}

impl MineKind {
    /// Parse a list kind from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "posted" => Some(Self::Posted),
            "upvoted" => Some(Self::Upvoted),
            "downvoted" => Some(Self::Downvoted),
            "bookmarks" | "bookmarked" => Some(Self::Bookmarks),
            _ => None,
        }
    }
}

/// Fields of a new question as given on the command line.
pub struct NewQuestionArgs<'a> {
    pub author: ViewerId,
    pub question: &'a str,
    pub answer: &'a str,
    pub company: &'a str,
    pub category: &'a str,
    pub interview_type: InterviewType,
    pub difficulty: Difficulty,
}

fn open_hub(config: &HubConfig) -> QnaResult<QuestionHub<MemoryStore>> {
    let store = SnapshotReader::read_store(&config.data_path)?;
    Ok(QuestionHub::new(store, config))
}

fn save_hub(hub: &QuestionHub<MemoryStore>, config: &HubConfig) -> QnaResult<()> {
    SnapshotWriter::write_store(hub.store(), &config.data_path)
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

/// Create a new empty .qnah file.
pub fn cmd_create(config: &HubConfig) -> QnaResult<()> {
    let path = &config.data_path;
    if path.exists() {
        return Err(QnaError::Validation(format!(
            "{} already exists",
            path.display()
        )));
    }
    SnapshotWriter::write_to_file(&Snapshot::default(), path)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Register a viewer.
pub fn cmd_register(config: &HubConfig, username: &str, json: bool) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let viewer = hub.register_viewer(username)?;
    save_hub(&hub, config)?;

    if json {
        print_json(&serde_json::json!({"id": viewer.id, "username": viewer.username}));
    } else {
        println!("Registered viewer {} ({})", viewer.id, viewer.username);
    }
    Ok(())
}

/// Post a question.
pub fn cmd_add(config: &HubConfig, args: NewQuestionArgs<'_>, json: bool) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let question = QuestionBuilder::new(args.author, args.question, args.answer)
        .company(args.company)
        .category(args.category)
        .interview_type(args.interview_type)
        .difficulty(args.difficulty)
        .build();
    let stored = hub.create_question(question)?;
    save_hub(&hub, config)?;

    if json {
        print_json(&serde_json::json!({"id": stored.id, "category": stored.category}));
    } else {
        println!(
            "Added question {} ({}, {}) to {}",
            stored.id,
            stored.company,
            stored.category,
            config.data_path.display()
        );
    }
    Ok(())
}

/// Show a question without counting a view.
pub fn cmd_get(config: &HubConfig, question_id: QuestionId, json: bool) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let question = hub.get_question(question_id)?;

    if json {
        print_json(&question);
    } else {
        print_question_detail(&QuestionView::anonymous(question));
    }
    Ok(())
}

/// Open a question's detail view, counting a view.
pub fn cmd_view(
    config: &HubConfig,
    question_id: QuestionId,
    viewer: Option<ViewerId>,
    json: bool,
) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let view = hub.open_question(question_id, viewer)?;
    save_hub(&hub, config)?;

    if json {
        print_json(&view);
    } else {
        print_question_detail(&view);
    }
    Ok(())
}

/// List one page of questions.
pub fn cmd_list(
    config: &HubConfig,
    viewer: Option<ViewerId>,
    filter: &ListingFilter,
    json: bool,
) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let page = hub.browse(viewer, filter)?;

    if json {
        print_json(&page);
    } else {
        for view in &page.items {
            print_question_line(view);
        }
        println!("\n{} results", page.items.len());
        if let Some(cursor) = &page.next_cursor {
            println!("Next page: --cursor {}", cursor);
        }
    }
    Ok(())
}

/// Toggle a vote.
pub fn cmd_vote(
    config: &HubConfig,
    question_id: QuestionId,
    viewer: ViewerId,
    direction: VoteDirection,
    json: bool,
) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let outcome = match direction {
        VoteDirection::Up => hub.toggle_upvote(question_id, viewer)?,
        VoteDirection::Down => hub.toggle_downvote(question_id, viewer)?,
    };
    save_hub(&hub, config)?;

    if json {
        print_json(&outcome);
    } else {
        let state = outcome.my_vote.map(|v| v.name()).unwrap_or("none");
        println!(
            "Question {}: {} votes (your vote: {})",
            question_id, outcome.votes, state
        );
    }
    Ok(())
}

/// Toggle a bookmark.
pub fn cmd_bookmark(
    config: &HubConfig,
    question_id: QuestionId,
    viewer: ViewerId,
    json: bool,
) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let bookmarks = hub.toggle_bookmark(question_id, viewer)?;
    save_hub(&hub, config)?;

    let bookmarked = bookmarks.contains(&question_id);
    if json {
        print_json(&serde_json::json!({"bookmarked": bookmarked, "bookmarks": bookmarks}));
    } else if bookmarked {
        println!("Bookmarked question {}", question_id);
    } else {
        println!("Removed bookmark on question {}", question_id);
    }
    Ok(())
}

/// Edit a question as its author.
pub fn cmd_edit(
    config: &HubConfig,
    question_id: QuestionId,
    author: ViewerId,
    patch: &QuestionPatch,
    json: bool,
) -> QnaResult<()> {
    if patch.is_empty() {
        return Err(QnaError::Validation("nothing to change".into()));
    }
    let hub = open_hub(config)?;
    let question = hub.update_question(question_id, author, patch)?;
    save_hub(&hub, config)?;

    if json {
        print_json(&question);
    } else {
        println!("Updated question {}", question.id);
    }
    Ok(())
}

/// Delete a question as its author.
pub fn cmd_delete(
    config: &HubConfig,
    question_id: QuestionId,
    author: ViewerId,
    json: bool,
) -> QnaResult<()> {
    let hub = open_hub(config)?;
    hub.delete_question(question_id, author)?;
    save_hub(&hub, config)?;

    if json {
        print_json(&serde_json::json!({"deleted": question_id}));
    } else {
        println!("Deleted question {}", question_id);
    }
    Ok(())
}

/// Append an answer to a question.
pub fn cmd_answer(
    config: &HubConfig,
    question_id: QuestionId,
    author: ViewerId,
    text: &str,
    json: bool,
) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let question = hub.answer_question(question_id, author, text)?;
    save_hub(&hub, config)?;

    if json {
        print_json(&serde_json::json!({"id": question.id, "answers": question.answers.len()}));
    } else {
        println!(
            "Answered question {} ({} answers)",
            question.id,
            question.answers.len()
        );
    }
    Ok(())
}

/// List the distinct categories.
pub fn cmd_categories(config: &HubConfig, json: bool) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let categories = hub.categories()?;

    if json {
        print_json(&categories);
    } else {
        for category in &categories {
            println!("{}", category);
        }
    }
    Ok(())
}

/// Show one of a viewer's question lists.
pub fn cmd_mine(config: &HubConfig, viewer: ViewerId, kind: MineKind, json: bool) -> QnaResult<()> {
    let hub = open_hub(config)?;
    let views: Vec<QuestionView> = match kind {
        MineKind::Posted => hub.authored_by(viewer)?,
        MineKind::Upvoted => anonymous(hub.upvoted_by(viewer)?),
        MineKind::Downvoted => anonymous(hub.downvoted_by(viewer)?),
        MineKind::Bookmarks => anonymous(hub.bookmarked_by(viewer)?),
    };

    if json {
        print_json(&views);
    } else {
        for view in &views {
            print_question_line(view);
        }
        println!("\n{} results", views.len());
    }
    Ok(())
}

fn anonymous(questions: Vec<Question>) -> Vec<QuestionView> {
    questions.into_iter().map(QuestionView::anonymous).collect()
}

/// Summary statistics about a .qnah file.
pub fn cmd_stats(config: &HubConfig, json: bool) -> QnaResult<()> {
    let path = &config.data_path;
    let store = SnapshotReader::read_store(path)?;
    let file_size = std::fs::metadata(path)?.len();
    let snapshot = store.snapshot()?;

    let total_votes: i64 = snapshot.questions.iter().map(|q| q.votes).sum();
    let total_views: u64 = snapshot.questions.iter().map(|q| q.views).sum();
    let total_bookmarks: usize = snapshot.viewers.iter().map(|v| v.bookmarks.len()).sum();
    let categories = store.categories()?.len();

    if json {
        print_json(&serde_json::json!({
            "questions": snapshot.questions.len(),
            "viewers": snapshot.viewers.len(),
            "authors": store.author_count()?,
            "categories": categories,
            "total_votes": total_votes,
            "total_views": total_views,
            "total_bookmarks": total_bookmarks,
            "file_size": file_size,
        }));
    } else {
        println!("Hub Statistics:");
        println!("  Questions: {}", snapshot.questions.len());
        println!("  Viewers: {}", snapshot.viewers.len());
        println!("  Authors: {}", store.author_count()?);
        println!("  Categories: {}", categories);
        println!("  Total votes: {}", total_votes);
        println!("  Total views: {}", total_views);
        println!("  Bookmarks: {}", total_bookmarks);
        println!("  File size: {}", format_size(file_size));
    }
    Ok(())
}

/// Export the whole snapshot as JSON.
pub fn cmd_export(config: &HubConfig, pretty: bool) -> QnaResult<()> {
    let snapshot = SnapshotReader::read_from_file(&config.data_path)?;
    if pretty {
        print_json(&snapshot);
    } else {
        println!("{}", serde_json::to_string(&snapshot).unwrap_or_default());
    }
    Ok(())
}

fn print_question_line(view: &QuestionView) {
    let q = &view.question;
    let mut marks = String::new();
    match view.my_vote {
        Some(VoteDirection::Up) => marks.push_str(" [up]"),
        Some(VoteDirection::Down) => marks.push_str(" [down]"),
        None => {}
    }
    if view.bookmarked {
        marks.push_str(" [bookmarked]");
    }
    println!(
        "Question {} ({}, {}, {} votes, {} views){}: {:?}",
        q.id, q.company, q.category, q.votes, q.views, marks, q.question
    );
}

fn print_question_detail(view: &QuestionView) {
    let q = &view.question;
    println!("Question {}", q.id);
    println!("  Company: {}", q.company);
    println!("  Category: {}", q.category);
    println!("  Interview type: {}", q.interview_type);
    println!("  Difficulty: {}", q.difficulty);
    println!("  Posted: {}", format_timestamp(q.created_at));
    println!("  Author: {}", q.author);
    println!("  Votes: {}", q.votes);
    println!("  Views: {}", q.views);
    if let Some(vote) = view.my_vote {
        println!("  Your vote: {}", vote);
    }
    if view.bookmarked {
        println!("  Bookmarked");
    }
    println!("  Question: {:?}", q.question);
    println!("  Answer: {:?}", q.answer);
    for answer in &q.answers {
        println!("  - viewer {}: {:?}", answer.author, answer.text);
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn format_timestamp(micros: u64) -> String {
    let secs = (micros / 1_000_000) as i64;
    let dt = chrono::DateTime::from_timestamp(secs, 0);
    match dt {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{} us", micros),
    }
}
