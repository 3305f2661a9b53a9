use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};

mod constants;
mod invitation;
mod media;
mod messages;
mod places;
mod player;
mod preview;
mod slide;
mod store;
mod story;
mod texture_loader;
mod viewer;

use crate::constants::{DEFAULT_TTL_DAYS, MAX_PHOTOS, MIN_PHOTOS};
use crate::invitation::Invitation;
use crate::media::{collect_photo_paths, MediaStore};
use crate::places::{PlaceSearch, TablePlaces};
use crate::preview::{render_preview, PreviewMeta};
use crate::store::{allocate_id, cleanup_expired, DirStore, InvitationStore};
use crate::story::build_story;
use crate::viewer::ViewerHooks;

#[derive(Parser)]
#[command(
    name = "wedding-story",
    about = "Story-style mobile wedding invitations: create, share, play",
    version
)]
struct Cli {
    // Storage root holding invitations/ and media/.
    #[arg(long, env = "WEDDING_STORY_ROOT", default_value = "data")]
    root: PathBuf,
    // Base of the shareable URLs printed and embedded in previews.
    #[arg(long, env = "WEDDING_STORY_BASE_URL", default_value = "https://www.mobilewedding.kr")]
    base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an invitation from a form file and a photo directory
    Create {
        /// JSON form file with the couple, venue and account details
        form: PathBuf,
        /// Directory with the 6 to 10 photos, played in filename order
        #[arg(long)]
        photos: PathBuf,
        /// Days until the invitation expires and cleanup removes it
        #[arg(long, default_value_t = DEFAULT_TTL_DAYS)]
        ttl_days: i64,
        /// JSON venue table overriding the built-in place search
        #[arg(long)]
        places: Option<PathBuf>,
    },
    /// Play a stored invitation as a story slideshow
    View {
        id: String,
    },
    /// List stored invitations with their expiry
    List,
    /// Delete expired invitations and their media
    Cleanup,
    /// Render the link-preview HTML for an id (or the landing page)
    Preview {
        id: Option<String>,
        #[arg(long, default_value = "assets/preview.html")]
        template: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let store = DirStore::new(&cli.root);
    let media = MediaStore::new(&cli.root);

    match cli.command {
        Command::Create {
            form,
            photos,
            ttl_days,
            places,
        } => create(&cli.base_url, &store, &media, &form, &photos, ttl_days, places.as_deref()),
        Command::View { id } => view(&store, &media, &id),
        Command::List => list(&store),
        Command::Cleanup => cleanup(&store, &media),
        Command::Preview { id, template } => {
            preview_html(&cli.base_url, &store, id.as_deref(), &template)
        }
    }
}

fn create(
    base_url: &str,
    store: &DirStore,
    media: &MediaStore,
    form: &std::path::Path,
    photos_dir: &std::path::Path,
    ttl_days: i64,
    places_file: Option<&std::path::Path>,
) -> Result<()> {
    let text = fs::read_to_string(form)
        .with_context(|| format!("failed to read form file {}", form.display()))?;
    let mut invitation: Invitation =
        serde_json::from_str(&text).with_context(|| format!("invalid form file {}", form.display()))?;

    let photos = collect_photo_paths(photos_dir)?;
    if !(MIN_PHOTOS..=MAX_PHOTOS).contains(&photos.len()) {
        bail!(
            "expected {MIN_PHOTOS} to {MAX_PHOTOS} photos in {}, found {}",
            photos_dir.display(),
            photos.len()
        );
    }
    if messages::find(&invitation.message_set_id).is_none() {
        let available: Vec<_> = messages::MESSAGE_SETS.iter().map(|s| s.id).collect();
        bail!(
            "unknown message set {:?}; available: {}",
            invitation.message_set_id,
            available.join(", ")
        );
    }

    // Fill missing venue coordinates through the place-search seam.
    if invitation.wedding_lat.is_none() || invitation.wedding_lng.is_none() {
        let provider: Box<dyn PlaceSearch> = match places_file {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read places file {}", path.display()))?;
                Box::new(TablePlaces::from_json(&json)?)
            }
            None => Box::new(TablePlaces::builtin()),
        };
        match provider.search(&invitation.wedding_location).into_iter().next() {
            Some(place) => {
                info!("resolved venue {:?} via place search", place.name);
                invitation.wedding_lat = Some(place.lat);
                invitation.wedding_lng = Some(place.lng);
                if invitation.wedding_address.is_empty() {
                    invitation.wedding_address = place.address;
                }
            }
            None => warn!(
                "no place found for {:?}; the details page will have no map links",
                invitation.wedding_location
            ),
        }
    }

    let id = allocate_id(store, &invitation)?;
    invitation.image_paths = media.import_photos(&id, &photos)?;
    invitation.created_at = Utc::now().timestamp_millis();
    invitation.expires_at = invitation.created_at + ttl_days * 24 * 60 * 60 * 1000;
    invitation.validate()?;
    // Prove the record renders before anyone gets the URL.
    build_story(&invitation)?;
    store.put(&id, &invitation)?;

    info!("created invitation {id} ({} photos)", invitation.image_paths.len());
    println!("{base_url}/{id}");
    Ok(())
}

fn view(store: &DirStore, media: &MediaStore, id: &str) -> Result<()> {
    let Some(invitation) = store.get(id)? else {
        bail!("invitation {id:?} not found");
    };
    if invitation.is_expired(Utc::now().timestamp_millis()) {
        warn!("invitation {id} has expired; it will disappear on the next cleanup");
    }
    let slides = build_story(&invitation)?;
    let hooks = ViewerHooks {
        // Stand-in for the bgm/preload side channel of the hosted viewer.
        on_slide_changed: Some(Box::new(|index| debug!("showing slide {index}"))),
    };
    viewer::run(&invitation, slides, media, hooks)
}

fn list(store: &DirStore) -> Result<()> {
    let records = store.list()?;
    if records.is_empty() {
        println!("no invitations stored");
        return Ok(());
    }
    let now = Utc::now().timestamp_millis();
    for (id, invitation) in records {
        let expiry = if invitation.expires_at == 0 {
            "-".to_string()
        } else {
            let days = (invitation.expires_at - now) / (24 * 60 * 60 * 1000);
            if days < 0 { "만료됨".to_string() } else { format!("D-{days}") }
        };
        println!(
            "{id}  {} ♥ {}  {}  {expiry}",
            invitation.groom_name, invitation.bride_name, invitation.wedding_date
        );
    }
    Ok(())
}

fn cleanup(store: &DirStore, media: &MediaStore) -> Result<()> {
    let report = cleanup_expired(store, media, Utc::now().timestamp_millis())?;
    println!("deleted {} invitation(s)", report.deleted.len());
    for id in &report.deleted {
        println!("  {id}");
    }
    for (id, error) in &report.failures {
        println!("  failed {id}: {error}");
    }
    Ok(())
}

fn preview_html(
    base_url: &str,
    store: &DirStore,
    id: Option<&str>,
    template: &std::path::Path,
) -> Result<()> {
    let html = fs::read_to_string(template)
        .with_context(|| format!("failed to read template {}", template.display()))?;
    let meta = match id {
        Some(id) => match store.get(id)? {
            Some(invitation) => PreviewMeta::for_invitation(id, &invitation, base_url),
            None => PreviewMeta::landing(base_url),
        },
        None => PreviewMeta::landing(base_url),
    };
    print!("{}", render_preview(&html, &meta));
    Ok(())
}
