mod config;

use std::{error::Error, sync::Arc};

use config::{
    Command, Config, ConnectionsCommand, EducationArgs, PostCommand, ProfileArgs, ProfileCommand,
};
use log::{error, info, warn};
use nexus_client::{
    events::{NoticeLevel, Notifier},
    guard::{navigate, Navigation, Route},
    models::{Certification, Registration},
    search::{SearchBox, MIN_QUERY_LEN},
    utils::{display_connections, display_requests, display_users},
    view::{ConnectionsView, EditProfile, ProfileTab},
    AppContext, FileStorage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();

    let (notifier, mut notices) = Notifier::channel();
    let storage = Arc::new(FileStorage::new(config.storage()));
    let ctx = AppContext::new(config.api_url(), storage, notifier)?;
    ctx.session.bootstrap();

    let result = run(&ctx, config.command).await;

    while let Ok(notice) = notices.try_recv() {
        match notice.level {
            NoticeLevel::Success => info!("{}", notice),
            NoticeLevel::Error => error!("{}", notice),
        }
    }
    Ok(result?)
}

async fn run(ctx: &AppContext, command: Command) -> nexus_client::Result<()> {
    let viewer = ctx.session.current_user();
    if let Some(route) = command.route(viewer.as_ref().map(|u| u.user_id)) {
        admit(ctx, route)?;
    }

    match command {
        Command::Login { email, password } => {
            let user = ctx.session.login(&email, &password).await?;
            info!("Welcome back, {}", user.display_name());
        }
        Command::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let registration = Registration {
                username,
                email,
                password,
                first_name,
                last_name,
            };
            let user = ctx.session.register(&registration).await?;
            info!("Welcome, {}", user.display_name());
        }
        Command::Logout => ctx.session.logout(),
        Command::Whoami => {
            if let Some(user) = viewer {
                info!("{} (@{}, id {})", user.display_name(), user.username, user.user_id);
            }
        }
        Command::Search { query } => search(ctx, query).await,
        Command::Connections { action } => connections(ctx, action).await?,
        Command::Post(action) => post(ctx, action).await?,
        Command::Profile(action) => profile(ctx, action).await?,
    }
    Ok(())
}

/// Runs the route's guard; bootstrap has already finished at this point
fn admit(ctx: &AppContext, route: Route) -> nexus_client::Result<()> {
    match navigate(&route.to_string(), &ctx.session.state()) {
        Navigation::Show(_) => Ok(()),
        Navigation::Redirect(Route::Login) => Err(nexus_client::Error::Validation(
            "Not signed in, run `nexus login` first".to_string(),
        )),
        Navigation::Redirect(_) => Err(nexus_client::Error::Validation(
            "Already signed in, run `nexus logout` first".to_string(),
        )),
        Navigation::Loading | Navigation::NotFound => Err(nexus_client::Error::Validation(
            format!("Cannot open {}", route),
        )),
    }
}

async fn search(ctx: &AppContext, query: String) {
    if query.chars().count() < MIN_QUERY_LEN {
        warn!("Type at least {} characters to search", MIN_QUERY_LEN);
        return;
    }

    let mut search = SearchBox::new(ctx.api.clone());
    search.input(query);
    search.settle().await;

    let results = search.state().visible_results();
    info!("{} users found", results.len());
    display_users(results);
}

async fn connections(
    ctx: &AppContext,
    action: Option<ConnectionsCommand>,
) -> nexus_client::Result<()> {
    let mut view = ConnectionsView::new(ctx.clone());
    view.load().await?;

    match action.unwrap_or(ConnectionsCommand::List) {
        ConnectionsCommand::List => {}
        ConnectionsCommand::Accept { id } => view.accept(id).await?,
        ConnectionsCommand::Reject { id } => view.reject(id).await?,
        ConnectionsCommand::Remove { user_id } => view.remove(user_id).await?,
    }

    info!("Connections ({})", view.connections().len());
    display_connections(view.connections());
    info!("Requests ({})", view.requests().len());
    display_requests(view.requests());
    Ok(())
}

async fn post(ctx: &AppContext, action: PostCommand) -> nexus_client::Result<()> {
    match action {
        PostCommand::Like { id } => {
            let liked = ctx.api.like_post(id).await?.liked;
            info!("Post {} {}", id, if liked { "liked" } else { "unliked" });
        }
        PostCommand::Save { id } => {
            ctx.api.save_to_watchlist(id).await?;
            info!("Saved post {} to watchlist", id);
        }
        PostCommand::Delete { id } => {
            ctx.api.delete_post(id).await?;
            info!("Deleted post {}", id);
        }
    }
    Ok(())
}

async fn profile(ctx: &AppContext, action: ProfileCommand) -> nexus_client::Result<()> {
    match action {
        ProfileCommand::Show { id } => {
            let Some(id) = id.or(ctx.session.current_user().map(|u| u.user_id)) else {
                return Ok(());
            };
            let profile = ctx.api.user(id).await?;
            let details = &profile.details;
            info!("@{} (id {})", profile.username, profile.user_id);
            let fields = [
                ("First name", details.first_name.clone()),
                ("Last name", details.last_name.clone()),
                ("Bio", details.bio.clone()),
                ("Level", details.core_level.map(|l| l.to_string())),
                ("Age", details.age.map(|a| a.to_string())),
                ("Learning", details.knowledge_today.clone()),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    info!("  {:<10} {}", label, value);
                }
            }
            if let Some(education) = &profile.education {
                if let Some(university) = &education.university_name {
                    info!("  {:<10} {}", "University", university);
                }
            }
            for cert in &profile.certifications {
                info!("  {:<10} {}", "Cert", cert.certification_name);
            }
        }
        ProfileCommand::Update(args) => {
            let mut editor = EditProfile::new(ctx.clone(), Some("profile"))?;
            editor.load().await;
            apply_profile(&mut editor, args);
            let next = editor.save_profile().await?;
            info!("Profile saved, see {}", next);
        }
        ProfileCommand::Education(args) => {
            let mut editor = EditProfile::new(ctx.clone(), Some("education"))?;
            editor.load().await;
            apply_education(&mut editor, args);
            editor.save_education().await?;
        }
        ProfileCommand::Cert { name, url, image } => {
            let mut editor = EditProfile::new(ctx.clone(), Some("cert"))?;
            editor.set_tab(ProfileTab::Certification);
            *editor.certification_mut() = Certification {
                certification_name: name,
                certificate_url: url,
                certificate_img: image,
            };
            editor.add_certification().await?;
        }
    }
    Ok(())
}

fn apply_profile(editor: &mut EditProfile, args: ProfileArgs) {
    let profile = editor.profile_mut();
    macro_rules! set {
        ($($field:ident <- $arg:expr),* $(,)?) => {
            $(if let Some(value) = $arg { profile.$field = Some(value); })*
        };
    }
    set! {
        first_name <- args.first_name,
        last_name <- args.last_name,
        bio <- args.bio,
        core_level <- args.core_level,
        knowledge_today <- args.knowledge_today,
        phone_no <- args.phone,
        age <- args.age,
        photo <- args.photo,
    }
}

fn apply_education(editor: &mut EditProfile, args: EducationArgs) {
    let education = editor.education_mut();
    macro_rules! set {
        ($($field:ident <- $arg:expr),* $(,)?) => {
            $(if let Some(value) = $arg { education.$field = Some(value); })*
        };
    }
    set! {
        university_name <- args.university,
        cgpa <- args.cgpa,
        virtual_course <- args.course,
        virtual_gpa <- args.virtual_gpa,
        hsc_name <- args.hsc_name,
        hsc_marks <- args.hsc_marks,
        ssc_name <- args.ssc_name,
        ssc_marks <- args.ssc_marks,
    }
}
