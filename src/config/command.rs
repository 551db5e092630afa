use clap::{Args, Subcommand};

use nexus_client::{
    guard::Route,
    models::{CoreLevel, Id},
};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long, env = "NEXUS_EMAIL")]
        email: String,
        #[arg(short, long, env = "NEXUS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "NEXUS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Search users by name (at least 2 characters)
    Search { query: String },
    /// List or act on connections and requests
    Connections {
        #[command(subcommand)]
        action: Option<ConnectionsCommand>,
    },
    #[command(subcommand)]
    Post(PostCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConnectionsCommand {
    List,
    /// Accept a pending request
    Accept { id: Id },
    /// Decline a pending request
    Reject { id: Id },
    /// Remove a connection by the other user's id
    Remove { user_id: Id },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PostCommand {
    /// Like or unlike a post
    Like { id: Id },
    /// Save a post to the watchlist
    Save { id: Id },
    /// Delete one of your posts
    Delete { id: Id },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileCommand {
    /// Show a profile, yours by default
    Show { id: Option<Id> },
    /// Change profile fields; unset flags keep their current value
    Update(ProfileArgs),
    /// Change education fields; unset flags keep their current value
    Education(EducationArgs),
    /// Add a certification
    Cert {
        name: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long, value_enum)]
    pub core_level: Option<CoreLevel>,
    /// What you learned today
    #[arg(long)]
    pub knowledge_today: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    /// Photo URL
    #[arg(long)]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct EducationArgs {
    #[arg(long)]
    pub university: Option<String>,
    #[arg(long)]
    pub cgpa: Option<f64>,
    #[arg(long)]
    pub course: Option<String>,
    #[arg(long)]
    pub virtual_gpa: Option<f64>,
    #[arg(long)]
    pub hsc_name: Option<String>,
    #[arg(long)]
    pub hsc_marks: Option<f64>,
    #[arg(long)]
    pub ssc_name: Option<String>,
    #[arg(long)]
    pub ssc_marks: Option<f64>,
}

impl Command {
    /// The screen this command stands in for; `None` runs unguarded
    pub fn route(&self, viewer: Option<Id>) -> Option<Route> {
        let route = match self {
            Self::Login { .. } => Route::Login,
            Self::Register { .. } => Route::Register,
            Self::Logout => return None,
            Self::Whoami | Self::Search { .. } => Route::Feed,
            Self::Connections { .. } => Route::Connections,
            Self::Post(
                PostCommand::Like { id } | PostCommand::Save { id } | PostCommand::Delete { id },
            ) => Route::Post(*id),
            Self::Profile(ProfileCommand::Show { id }) => match id.or(viewer) {
                Some(id) => Route::Profile(id),
                None => Route::Feed,
            },
            Self::Profile(_) => Route::EditProfile,
        };
        Some(route)
    }
}
