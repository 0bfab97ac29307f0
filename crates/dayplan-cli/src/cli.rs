use clap::{Parser, Subcommand};
use dayplan_core::models::{Category, Criticality, Repeat};

/// Dayplan: plan your day, keep your streak
#[derive(Parser, Debug)]
#[command(name = "dayplan", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// Show the dashboard: my day, overdue, today and upcoming
    List(ListCommand),
    /// Show the timeline of one day
    Day(DayCommand),
    /// Show a month calendar
    Month(MonthCommand),
    /// Complete a task occurrence, or un-complete it if already done
    Do(DoCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Move a task to another time of day
    Move(MoveCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Plan today: commit, snooze or delete each due task
    Plan(PlanCommand),
    /// Show completion statistics
    Report(ReportCommand),
    /// Manage rewards
    Reward(RewardCommand),
    /// Manage notes
    Note(NoteCommand),
    /// Show or update your profile, points, streak and badges
    Profile(ProfileCommand),
    /// Ask AI for sub-task suggestions
    Suggest(SuggestCommand),
    /// Run reminders in the foreground until interrupted
    Remind(RemindCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// Work, home or life
    #[clap(short, long, default_value = "work")]
    pub category: Category,
    /// When the task starts (e.g. "2024-05-01 09:30", "tomorrow 9am")
    #[clap(long)]
    pub due: Option<String>,
    /// Duration in minutes (at most a day)
    #[clap(short = 'm', long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1440))]
    pub duration: u32,
    /// Urgent, high, medium or low
    #[clap(long, default_value = "medium")]
    pub criticality: Criticality,
    /// None, daily, weekly or monthly
    #[clap(short, long, default_value = "none")]
    pub repeat: Repeat,
    /// Remind this many minutes before the task starts
    #[clap(long)]
    pub reminder: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only show tasks of this category
    #[clap(short, long)]
    pub category: Option<Category>,
}

#[derive(Parser, Debug, Clone)]
pub struct DayCommand {
    /// The day to show (defaults to today)
    #[clap(short, long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct MonthCommand {
    /// The month to show as YYYY-MM (defaults to the current month)
    #[clap(short, long)]
    pub month: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DoCommand {
    /// The ID of the task
    pub id: String,
    /// The occurrence day (defaults to today)
    #[clap(short, long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub category: Option<Category>,

    #[arg(long)]
    pub due: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1440))]
    pub duration: Option<u32>,

    #[arg(long)]
    pub criticality: Option<Criticality>,

    #[arg(long)]
    pub repeat: Option<Repeat>,

    #[arg(long)]
    pub reminder: Option<u32>,
    #[arg(long, conflicts_with = "reminder")]
    pub reminder_clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct MoveCommand {
    /// The ID of the task to move
    pub id: String,
    /// New start time as HH:MM, snapped to the timeline grid
    #[clap(long)]
    pub at: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanCommand {
    /// Commit every candidate without prompting
    #[clap(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ReportCommand {
    /// The month for the daily breakdown as YYYY-MM (defaults to the current month)
    #[clap(short, long)]
    pub month: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RewardCommand {
    #[command(subcommand)]
    pub command: RewardSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RewardSubcommand {
    /// Add a new reward
    Add(AddRewardCommand),
    /// List rewards
    List,
    /// Spend points on a reward
    Redeem(RedeemRewardCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddRewardCommand {
    /// The name of the reward
    pub name: String,
    /// The cost in points
    pub cost: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct RedeemRewardCommand {
    /// The ID of the reward
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub command: NoteSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteSubcommand {
    /// Add a new note
    Add(AddNoteCommand),
    /// List notes, newest first
    List,
    /// Edit a note
    Edit(EditNoteCommand),
    /// Delete a note
    Delete(DeleteNoteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddNoteCommand {
    /// The title of the note
    pub title: String,
    /// The body of the note
    #[clap(short, long, default_value = "")]
    pub content: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditNoteCommand {
    /// The ID of the note
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteNoteCommand {
    /// The ID of the note
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ProfileCommand {
    /// Set your display name
    #[clap(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SuggestCommand {
    /// The task title to break down
    pub title: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RemindCommand {
    /// Print the reminders that would be armed and exit
    #[clap(long)]
    pub once: bool,
}
