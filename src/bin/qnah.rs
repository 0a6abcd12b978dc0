//! CLI entry point for the `qnah` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use qna_hub::cli::commands::{self, MineKind, NewQuestionArgs};
use qna_hub::types::{
    Difficulty, InterviewType, QnaError, QnaResult, QuestionPatch, SortOrder, VoteDirection,
};
use qna_hub::{HubConfig, ListingFilter};

#[derive(Parser)]
#[command(
    name = "qnah",
    about = "QnA Hub CLI: share interview questions, vote, bookmark and browse"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the .qnah file (overrides the config)
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty .qnah file
    Create,
    /// Register a viewer
    Register {
        /// Unique username
        username: String,
    },
    /// Post a question
    Add {
        /// Posting viewer ID
        #[arg(long)]
        author: u64,
        /// The question text
        question: String,
        /// The reference answer
        answer: String,
        /// Company the question was asked at
        #[arg(long)]
        company: String,
        /// Category label
        #[arg(long)]
        category: String,
        /// technical, behavioral, system-design, coding, case-study
        #[arg(long, default_value = "technical")]
        interview_type: String,
        /// easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,
    },
    /// Show a question without counting a view
    Get {
        /// Question ID
        question_id: u64,
    },
    /// Open a question's detail view (counts a view)
    View {
        /// Question ID
        question_id: u64,
        /// Viewer to annotate for
        #[arg(long)]
        viewer: Option<u64>,
    },
    /// List one page of questions
    List {
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,
        /// Comma-separated category labels
        #[arg(long)]
        category: Option<String>,
        /// Sort: newest, votes, company
        #[arg(long, default_value = "newest")]
        sort: String,
        /// Page size
        #[arg(long)]
        limit: Option<usize>,
        /// Cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Viewer to annotate for
        #[arg(long)]
        viewer: Option<u64>,
    },
    /// Toggle an upvote
    Upvote {
        /// Question ID
        question_id: u64,
        /// Voting viewer ID
        #[arg(long)]
        viewer: u64,
    },
    /// Toggle a downvote
    Downvote {
        /// Question ID
        question_id: u64,
        /// Voting viewer ID
        #[arg(long)]
        viewer: u64,
    },
    /// Toggle a bookmark
    Bookmark {
        /// Question ID
        question_id: u64,
        /// Viewer ID
        #[arg(long)]
        viewer: u64,
    },
    /// Edit a question you posted
    Edit {
        /// Question ID
        question_id: u64,
        /// Author viewer ID
        #[arg(long)]
        author: u64,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        interview_type: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Delete a question you posted
    Delete {
        /// Question ID
        question_id: u64,
        /// Author viewer ID
        #[arg(long)]
        author: u64,
    },
    /// Add a community answer to a question
    Answer {
        /// Question ID
        question_id: u64,
        /// Answering viewer ID
        #[arg(long)]
        author: u64,
        /// Answer text
        text: String,
    },
    /// List all categories
    Categories,
    /// Show a viewer's questions: posted, upvoted, downvoted, bookmarks
    Mine {
        /// Viewer ID
        viewer: u64,
        /// Which list to show
        #[arg(long, default_value = "posted")]
        kind: String,
    },
    /// Summary statistics about the hub
    Stats,
    /// Export the whole hub as JSON
    Export {
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let mut config = match HubConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(exit_code(&e));
        }
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli.command, &config, json) {
        eprintln!("Error: {}", e);
        process::exit(exit_code(&e));
    }
}

fn run(command: Commands, config: &HubConfig, json: bool) -> QnaResult<()> {
    match command {
        Commands::Create => commands::cmd_create(config),
        Commands::Register { username } => commands::cmd_register(config, &username, json),
        Commands::Add {
            author,
            question,
            answer,
            company,
            category,
            interview_type,
            difficulty,
        } => {
            let args = NewQuestionArgs {
                author,
                question: &question,
                answer: &answer,
                company: &company,
                category: &category,
                interview_type: interview_type.parse::<InterviewType>()?,
                difficulty: difficulty.parse::<Difficulty>()?,
            };
            commands::cmd_add(config, args, json)
        }
        Commands::Get { question_id } => commands::cmd_get(config, question_id, json),
        Commands::View {
            question_id,
            viewer,
        } => commands::cmd_view(config, question_id, viewer, json),
        Commands::List {
            search,
            category,
            sort,
            limit,
            cursor,
            viewer,
        } => {
            let mut filter = ListingFilter::new().sort(sort.parse::<SortOrder>()?);
            filter.search = search;
            filter.page_size = limit;
            filter.cursor = cursor;
            if let Some(categories) = category {
                for label in categories.split(',').filter(|t| !t.trim().is_empty()) {
                    filter = filter.category(label.trim());
                }
            }
            commands::cmd_list(config, viewer, &filter, json)
        }
        Commands::Upvote {
            question_id,
            viewer,
        } => commands::cmd_vote(config, question_id, viewer, VoteDirection::Up, json),
        Commands::Downvote {
            question_id,
            viewer,
        } => commands::cmd_vote(config, question_id, viewer, VoteDirection::Down, json),
        Commands::Bookmark {
            question_id,
            viewer,
        } => commands::cmd_bookmark(config, question_id, viewer, json),
        Commands::Edit {
            question_id,
            author,
            question,
            answer,
            company,
            category,
            interview_type,
            difficulty,
        } => {
            let patch = QuestionPatch {
                question,
                answer,
                company,
                category,
                interview_type: interview_type
                    .map(|t| t.parse::<InterviewType>())
                    .transpose()?,
                difficulty: difficulty.map(|d| d.parse::<Difficulty>()).transpose()?,
            };
            commands::cmd_edit(config, question_id, author, &patch, json)
        }
        Commands::Delete {
            question_id,
            author,
        } => commands::cmd_delete(config, question_id, author, json),
        Commands::Answer {
            question_id,
            author,
            text,
        } => commands::cmd_answer(config, question_id, author, &text, json),
        Commands::Categories => commands::cmd_categories(config, json),
        Commands::Mine { viewer, kind } => {
            let kind = MineKind::from_name(&kind)
                .ok_or_else(|| QnaError::Validation(format!("unknown list kind: {kind}")))?;
            commands::cmd_mine(config, viewer, kind, json)
        }
        Commands::Stats => commands::cmd_stats(config, json),
        Commands::Export { pretty } => commands::cmd_export(config, pretty),
    }
}

fn exit_code(e: &QnaError) -> i32 {
    match e {
        QnaError::Io(_) => 1,
        QnaError::InvalidMagic
        | QnaError::UnsupportedVersion(_)
        | QnaError::Truncated
        | QnaError::Corrupt(_)
        | QnaError::Compression(_)
        | QnaError::Json(_) => 2,
        QnaError::Validation(_) | QnaError::InvalidCursor(_) => 3,
        QnaError::QuestionNotFound(_) | QnaError::ViewerNotFound(_) => 4,
        _ => 5,
    }
}
