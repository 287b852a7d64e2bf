use anyhow::Result;
use clap::{Parser, Subcommand};

use motiverse::commands::{self, watch::WatchTarget, AppContext};
use motiverse::models::InboxTab;
use motiverse::services::AuthState;
use motiverse::utils::config::{self, Config};
use motiverse::AppError;

#[derive(Parser)]
#[command(name = "motiverse", version, about = "Motiverse wellness companion")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Personal goals and the daily completion streak
    Goals {
        #[command(subcommand)]
        cmd: GoalsCmd,
    },
    /// Calendar events
    Events {
        #[command(subcommand)]
        cmd: EventsCmd,
    },
    /// Saved links
    Bookmarks {
        #[command(subcommand)]
        cmd: BookmarksCmd,
    },
    /// Messages addressed by email
    Inbox {
        #[command(subcommand)]
        cmd: InboxCmd,
    },
    /// Company-wide news feed
    News {
        #[command(subcommand)]
        cmd: NewsCmd,
    },
    /// Appearance and dashboard preferences
    Settings {
        #[command(subcommand)]
        cmd: SettingsCmd,
    },
    /// Employee profile shown on the dashboard
    Profile {
        #[command(subcommand)]
        cmd: ProfileCmd,
    },
    /// Print today's motivational prompt
    Prompt,
    /// Follow a collection live until Ctrl-C
    Watch {
        #[arg(value_enum)]
        target: WatchTarget,
    },
}

#[derive(Subcommand)]
enum GoalsCmd {
    List,
    Add { text: String },
    /// Flip completion of a goal (full id or unique prefix)
    Toggle { id: String },
    Streak,
}

#[derive(Subcommand)]
enum EventsCmd {
    List,
    Add {
        title: String,
        /// Calendar day, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Wellness, focus block, 1:1, deadline or other
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum BookmarksCmd {
    List,
    Add {
        label: String,
        url: String,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
enum InboxCmd {
    Received,
    Sent,
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        title: String,
        body: String,
    },
    /// Mark a received message read or unread
    ToggleRead { id: String },
}

#[derive(Subcommand)]
enum NewsCmd {
    List,
    Post { title: String, summary: String },
}

#[derive(Subcommand)]
enum SettingsCmd {
    Show,
    /// Change one setting locally, e.g. `accent blue`
    Set { key: String, value: String },
    Reset,
    /// Push the local settings to the store
    Save,
}

#[derive(Subcommand)]
enum ProfileCmd {
    Show,
    /// Update fields given as key=value, e.g. `department=Engineering`
    Save {
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

impl Cmd {
    /// What the banner calls this command's data when it fails.
    fn subject(&self) -> &'static str {
        match self {
            Cmd::Goals { cmd: GoalsCmd::Add { .. } | GoalsCmd::Toggle { .. } } => "goal",
            Cmd::Goals { .. } => "goals",
            Cmd::Events { cmd: EventsCmd::Add { .. } } => "event",
            Cmd::Events { .. } => "events",
            Cmd::Bookmarks { cmd: BookmarksCmd::Add { .. } } => "bookmark",
            Cmd::Bookmarks { .. } => "bookmarks",
            Cmd::Inbox { cmd: InboxCmd::Send { .. } | InboxCmd::ToggleRead { .. } } => "message",
            Cmd::Inbox { .. } => "messages",
            Cmd::News { cmd: NewsCmd::Post { .. } } => "news post",
            Cmd::News { .. } => "news",
            Cmd::Settings { .. } => "settings",
            Cmd::Profile { .. } => "profile",
            Cmd::Prompt => "prompt",
            Cmd::Watch { .. } => "live data",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let subject = cli.cmd.subject();

    if let Err(err) = run(cli.cmd).await {
        log::error!("{}", err);
        eprintln!("{}", err.banner(subject));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cmd: Cmd) -> Result<(), AppError> {
    let config = Config::load()?;

    let auth = AuthState::new();
    match config.session() {
        Some(session) => auth.sign_in(session),
        None => {
            return Err(AppError::Auth(
                "Not signed in. Set MOTIVERSE_USER_ID (and MOTIVERSE_EMAIL for the inbox).".to_string(),
            ))
        }
    }
    let session = auth.require()?;
    log::debug!("Signed in as {}", session.user_id);

    let ctx = AppContext::open(config, session)?;

    match cmd {
        Cmd::Goals { cmd } => match cmd {
            GoalsCmd::List => commands::goals::list(&ctx).await,
            GoalsCmd::Add { text } => commands::goals::add(&ctx, &text).await,
            GoalsCmd::Toggle { id } => commands::goals::toggle(&ctx, &id).await,
            GoalsCmd::Streak => commands::goals::streak(&ctx).await,
        },
        Cmd::Events { cmd } => match cmd {
            EventsCmd::List => commands::calendar::list(&ctx).await,
            EventsCmd::Add { title, date, category } => {
                commands::calendar::add(&ctx, &title, &date, category.as_deref()).await
            }
        },
        Cmd::Bookmarks { cmd } => match cmd {
            BookmarksCmd::List => commands::bookmarks::list(&ctx).await,
            BookmarksCmd::Add { label, url, note } => {
                commands::bookmarks::add(&ctx, &label, &url, note.as_deref()).await
            }
        },
        Cmd::Inbox { cmd } => match cmd {
            InboxCmd::Received => commands::inbox::list(&ctx, InboxTab::Received).await,
            InboxCmd::Sent => commands::inbox::list(&ctx, InboxTab::Sent).await,
            InboxCmd::Send { to, title, body } => commands::inbox::send(&ctx, &to, &title, &body).await,
            InboxCmd::ToggleRead { id } => commands::inbox::toggle_read(&ctx, &id).await,
        },
        Cmd::News { cmd } => match cmd {
            NewsCmd::List => commands::news::list(&ctx).await,
            NewsCmd::Post { title, summary } => commands::news::post(&ctx, &title, &summary).await,
        },
        Cmd::Settings { cmd } => match cmd {
            SettingsCmd::Show => commands::settings::show(&ctx).await,
            SettingsCmd::Set { key, value } => commands::settings::set(&ctx, &key, &value).await,
            SettingsCmd::Reset => commands::settings::reset(&ctx).await,
            SettingsCmd::Save => commands::settings::save(&ctx).await,
        },
        Cmd::Profile { cmd } => match cmd {
            ProfileCmd::Show => commands::dashboard::show_profile(&ctx).await,
            ProfileCmd::Save { fields } => commands::dashboard::save_profile(&ctx, &fields).await,
        },
        Cmd::Prompt => commands::dashboard::prompt(&ctx).await,
        Cmd::Watch { target } => commands::watch::run(&ctx, target).await,
    }
}
