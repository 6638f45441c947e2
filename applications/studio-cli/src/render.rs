/// Plain-text rendering of the studio views
use studio_core::{Genre, Track};
use studio_views::{AuthMode, Banner, LibraryStats, PlayerView};

pub fn genres(genres: &[Genre]) -> String {
    if genres.is_empty() {
        return "No genres yet. Add one with `genre add <name>`.".to_string();
    }

    genres
        .iter()
        .map(|genre| {
            format!(
                "{:>5}  {:<24} {}",
                genre.id,
                genre.name,
                genre.color.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Track table; `thumbnail` resolves the cover URL (placeholder included)
pub fn tracks(tracks: &[Track], thumbnail: impl Fn(&Track) -> String) -> String {
    if tracks.is_empty() {
        return "No tracks found.".to_string();
    }

    tracks
        .iter()
        .map(|track| {
            let mut line = format!(
                "{:>5}  {} - {}  [{}]  {}",
                track.id,
                track.title,
                track.artist_label(),
                track.genre_label(),
                track.created_at.format("%Y-%m-%d"),
            );
            if !track.is_playable() {
                line.push_str("  (no audio)");
            }
            line.push_str("\n       cover: ");
            line.push_str(&thumbnail(track));
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Player bar, or a note when nothing is loaded
pub fn player(view: Option<&PlayerView>) -> String {
    let Some(view) = view else {
        return "Nothing playing.".to_string();
    };

    let state = if view.is_playing { "playing" } else { "paused" };
    let volume = if view.muted {
        "muted".to_string()
    } else {
        format!("vol {:.0}%", view.volume * 100.0)
    };

    format!(
        "[{}] {} - {}  {}  {}",
        state,
        view.title,
        view.artist,
        view.time_label(),
        volume
    )
}

pub fn banner(banner: &Banner) -> String {
    match banner {
        Banner::Error(msg) => format!("error: {}", msg),
        Banner::Info(msg) => msg.clone(),
    }
}

pub fn stats(stats: LibraryStats) -> String {
    format!("{} tracks, {} genres", stats.tracks, stats.genres)
}

/// Hint for the form currently shown while signed out
pub fn auth_hint(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::SignIn => "Sign in: signin <email> <password>",
        AuthMode::SignUp => "Create an account: signup <email> <password> <confirm>",
        AuthMode::Otp => "Get a sign-in code: magic <email>",
        AuthMode::Verify => "Enter the 6-digit code from your email: code <digits>",
        AuthMode::Forgot => "Reset your password: forgot <email>",
    }
}
