//! Command-line argument definitions.
//!
//! Each subcommand's arguments live in a clap `Args` struct that converts into
//! the matching `dayflow_core::params` type, so core parameters stay free of
//! clap derives:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```
//!
//! Plan item indices are 1-based here and zero-based in the core.

use std::{net::SocketAddr, path::PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use dayflow_core::{
    params::{AddTask, Confirm, EnableSync, GeneratePlan, Id, ItemEdit, PlanEdit, SetApiKey},
    ClockTime, ItemKind, Language, Priority, Segment,
};

/// Dayflow: plan your day from a task list with an LLM.
///
/// Tasks are stored locally. `dayflow plan generate` sends them to Gemini and
/// stores the resulting morning/afternoon/evening schedule, which can then be
/// reviewed and edited from the command line.
#[derive(Parser)]
#[command(version, about, name = "dayflow")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/dayflow/dayflow.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the task list
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Generate, show and edit the day plan
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Browse past generations
    #[command(alias = "h")]
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// API key and language settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Push local changes to a remote store
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Run the OAuth PKCE relay
    Serve(ServeArgs),
}

// ============================================================================
// Value enums
// ============================================================================

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(val: PriorityArg) -> Self {
        match val {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    /// Vietnamese
    Vi,
    /// English
    En,
}

impl From<LanguageArg> for Language {
    fn from(val: LanguageArg) -> Self {
        match val {
            LanguageArg::Vi => Language::Vi,
            LanguageArg::En => Language::En,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SegmentArg {
    Morning,
    Afternoon,
    Evening,
}

impl From<SegmentArg> for Segment {
    fn from(val: SegmentArg) -> Self {
        match val {
            SegmentArg::Morning => Segment::Morning,
            SegmentArg::Afternoon => Segment::Afternoon,
            SegmentArg::Evening => Segment::Evening,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Work,
    Break,
    Buffer,
}

impl From<KindArg> for ItemKind {
    fn from(val: KindArg) -> Self {
        match val {
            KindArg::Work => ItemKind::Work,
            KindArg::Break => ItemKind::Break,
            KindArg::Buffer => ItemKind::Buffer,
        }
    }
}

// ============================================================================
// Task commands
// ============================================================================

/// Add a task
#[derive(ClapArgs)]
pub struct AddTaskArgs {
    /// What needs doing
    pub title: String,
    /// Estimated duration in minutes
    #[arg(short, long, default_value_t = dayflow_core::params::DEFAULT_DURATION)]
    pub duration: u32,
    #[arg(short, long, value_enum, default_value_t = PriorityArg::Medium)]
    pub priority: PriorityArg,
    /// Latest finishing time (HH:MM)
    #[arg(long)]
    pub deadline: Option<ClockTime>,
    /// Pin the task to an exact start time (HH:MM)
    #[arg(long = "at")]
    pub fixed_time: Option<ClockTime>,
}

impl From<AddTaskArgs> for AddTask {
    fn from(val: AddTaskArgs) -> Self {
        AddTask {
            title: val.title,
            duration: val.duration,
            priority: val.priority.into(),
            deadline: val.deadline,
            fixed_time: val.fixed_time,
        }
    }
}

/// Remove a task
#[derive(ClapArgs)]
pub struct RemoveTaskArgs {
    #[arg(help = "ID of the task to remove")]
    pub id: u64,
}

impl From<RemoveTaskArgs> for Id {
    fn from(val: RemoveTaskArgs) -> Self {
        Id { id: val.id }
    }
}

/// Confirmation flag shared by destructive commands
#[derive(ClapArgs)]
pub struct ConfirmArgs {
    /// Confirm the operation (required to prevent accidents)
    #[arg(long)]
    pub confirm: bool,
}

impl From<ConfirmArgs> for Confirm {
    fn from(val: ConfirmArgs) -> Self {
        Confirm {
            confirmed: val.confirm,
        }
    }
}

/// Import tasks, one per line
#[derive(ClapArgs)]
pub struct ImportTasksArgs {
    /// File to read; standard input when omitted
    ///
    /// Line format: `Title - 45p - 9:30am !cao`. Duration accepts `1.5h`,
    /// `90p` or `90`; priority markers are `!cao`, `!trung`, `!thấp`.
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List tasks
    #[command(aliases = ["l", "ls"])]
    List,
    /// Remove a task
    #[command(alias = "rm")]
    Remove(RemoveTaskArgs),
    /// Remove every task
    Clear(ConfirmArgs),
    /// Import tasks from text
    Import(ImportTasksArgs),
    /// Print tasks in import format
    Export,
}

// ============================================================================
// Plan commands
// ============================================================================

/// Generate a plan from the current tasks
#[derive(ClapArgs)]
pub struct GeneratePlanArgs {
    /// Prompt and reply language; defaults to the configured language
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageArg>,
}

impl From<GeneratePlanArgs> for GeneratePlan {
    fn from(val: GeneratePlanArgs) -> Self {
        GeneratePlan {
            language: val.language.map(Into::into),
        }
    }
}

/// Address of one plan item
#[derive(ClapArgs)]
pub struct ItemArgs {
    #[arg(value_enum, help = "Segment holding the item")]
    pub segment: SegmentArg,
    #[arg(
        value_parser = clap::value_parser!(u64).range(1..),
        help = "1-based position of the item within its segment"
    )]
    pub index: u64,
}

impl ItemArgs {
    fn zero_based(&self) -> usize {
        (self.index - 1) as usize
    }

    pub fn move_up(&self) -> PlanEdit {
        PlanEdit::MoveUp {
            segment: self.segment.into(),
            index: self.zero_based(),
        }
    }

    pub fn move_down(&self) -> PlanEdit {
        PlanEdit::MoveDown {
            segment: self.segment.into(),
            index: self.zero_based(),
        }
    }
}

/// Remove one plan item
#[derive(ClapArgs)]
pub struct RemoveItemArgs {
    #[command(flatten)]
    pub item: ItemArgs,
    /// Confirm the removal
    #[arg(long)]
    pub confirm: bool,
}

impl From<RemoveItemArgs> for PlanEdit {
    fn from(val: RemoveItemArgs) -> Self {
        PlanEdit::Remove {
            segment: val.item.segment.into(),
            index: val.item.zero_based(),
            confirmed: val.confirm,
        }
    }
}

/// Change fields of one plan item
#[derive(ClapArgs)]
pub struct SetItemArgs {
    #[command(flatten)]
    pub item: ItemArgs,
    /// New start time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
    /// New duration in minutes
    #[arg(long)]
    pub duration: Option<u32>,
    /// New reason; an empty string clears it
    #[arg(long)]
    pub reason: Option<String>,
}

impl From<SetItemArgs> for Vec<PlanEdit> {
    fn from(val: SetItemArgs) -> Self {
        let segment: Segment = val.item.segment.into();
        let index = val.item.zero_based();
        let edits = [
            val.time.map(ItemEdit::Time),
            val.title.map(ItemEdit::Title),
            val.kind.map(|kind| ItemEdit::Kind(kind.into())),
            val.duration.map(ItemEdit::Duration),
            val.reason.map(|reason| ItemEdit::Reason(Some(reason))),
        ];
        edits
            .into_iter()
            .flatten()
            .map(|edit| PlanEdit::Update {
                segment,
                index,
                edit,
            })
            .collect()
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate a new plan from the task list
    #[command(alias = "g")]
    Generate(GeneratePlanArgs),
    /// Show the current plan
    #[command(alias = "s")]
    Show,
    /// Show the item scheduled right now
    Now,
    /// Discard the current plan
    Clear(ConfirmArgs),
    /// Move an item one slot earlier
    MoveUp(ItemArgs),
    /// Move an item one slot later
    MoveDown(ItemArgs),
    /// Remove an item
    #[command(alias = "rm")]
    Remove(RemoveItemArgs),
    /// Change an item's fields
    Set(SetItemArgs),
}

// ============================================================================
// History commands
// ============================================================================

#[derive(ClapArgs)]
pub struct HistoryIdArgs {
    #[arg(help = "ID of the history entry")]
    pub id: u64,
}

impl From<HistoryIdArgs> for Id {
    fn from(val: HistoryIdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List past generations, most recent first
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show one past generation
    #[command(alias = "s")]
    Show(HistoryIdArgs),
    /// Print the tasks of a past generation in import format
    Export(HistoryIdArgs),
    /// Delete all history
    Clear(ConfirmArgs),
}

// ============================================================================
// Config commands
// ============================================================================

#[derive(ClapArgs)]
pub struct SetKeyArgs {
    /// Gemini API key (starts with `AIza`)
    pub key: String,
}

impl From<SetKeyArgs> for SetApiKey {
    fn from(val: SetKeyArgs) -> Self {
        SetApiKey { key: val.key }
    }
}

#[derive(ClapArgs)]
pub struct LanguageArgs {
    #[arg(value_enum)]
    pub language: LanguageArg,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Store the API key
    SetKey(SetKeyArgs),
    /// Delete the stored API key
    RemoveKey(ConfirmArgs),
    /// Show current settings
    Show,
    /// Set the default plan language
    Language(LanguageArgs),
}

// ============================================================================
// Sync commands
// ============================================================================

#[derive(ClapArgs)]
pub struct EnableSyncArgs {
    /// Remote account id
    #[arg(long)]
    pub user: String,
    /// Base URL of the sync service
    #[arg(long)]
    pub endpoint: String,
}

impl From<EnableSyncArgs> for EnableSync {
    fn from(val: EnableSyncArgs) -> Self {
        EnableSync {
            user_id: val.user,
            endpoint: val.endpoint,
        }
    }
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Start queueing changes for an account
    Enable(EnableSyncArgs),
    /// Stop syncing and drop queued changes
    Disable,
    /// Show sync settings and queue size
    Status,
    /// Push queued changes now
    Run,
}

// ============================================================================
// Relay
// ============================================================================

#[derive(ClapArgs)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,
}
