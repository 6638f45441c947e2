/// Interactive command shell
///
/// Every prompt line is split into words and parsed with clap, then run
/// against the studio views. Signed-out users get the auth commands;
/// everything else needs a session.
use crate::error::{CliError, Result};
use crate::media::load_media;
use crate::render;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use studio_core::{GenreId, TrackDraft, TrackId};
use studio_views::auth::CODE_LENGTH;
use studio_views::{AuthMode, AuthStep, Studio};
use tracing::debug;

/// Result of running one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

#[derive(Parser, Debug)]
#[command(
    name = "studio",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ShellCommand {
    /// Sign in with email and password
    Signin { email: String, password: String },

    /// Create an account
    Signup {
        email: String,
        password: String,
        confirm: String,
    },

    /// Email a one-time sign-in code
    Magic { email: String },

    /// Enter the code from the email
    Code { digits: String },

    /// Request a password reset email
    Forgot { email: String },

    /// Switch the sign-in form
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Sign out
    Signout,

    /// List genres
    Genres,

    /// Add, edit or remove a genre
    Genre {
        #[command(subcommand)]
        action: GenreAction,
    },

    /// List tracks, optionally filtered by title or artist
    Tracks { query: Option<String> },

    /// Upload a track
    Publish {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        artist: String,
        #[arg(long)]
        audio: Option<PathBuf>,
        #[arg(long)]
        cover: Option<PathBuf>,
        #[arg(long)]
        genre: Option<String>,
    },

    /// Delete a track
    Rm { id: String },

    /// Play a track
    Play { id: String },

    /// Pause or resume
    Toggle,

    /// Set the volume (0.0 to 1.0)
    Volume {
        #[arg(allow_hyphen_values = true)]
        level: f32,
    },

    /// Mute or unmute
    Mute,

    /// Jump to a point in the track (0.0 to 1.0)
    Seek {
        #[arg(allow_hyphen_values = true)]
        fraction: f32,
    },

    /// Stop and close the player
    Stop,

    /// Show the player and library counters
    Status,

    /// Show available commands
    Help,

    /// Leave the studio
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum GenreAction {
    /// Create a genre with the default color
    Add { name: String },

    /// Rename a genre, optionally changing its color
    Edit {
        id: String,
        name: String,
        #[arg(long)]
        color: Option<String>,
    },

    /// Change a genre's color
    Color { id: String, color: String },

    /// Delete a genre
    Rm { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Signin,
    Signup,
    Otp,
    Verify,
    Forgot,
}

impl From<ModeArg> for AuthMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Signin => AuthMode::SignIn,
            ModeArg::Signup => AuthMode::SignUp,
            ModeArg::Otp => AuthMode::Otp,
            ModeArg::Verify => AuthMode::Verify,
            ModeArg::Forgot => AuthMode::Forgot,
        }
    }
}

/// Split a line into words. Single and double quotes group words.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::Parse("Unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse one prompt line. Blank lines give `None`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>> {
    let words = tokenize(line)?;
    if words.is_empty() {
        return Ok(None);
    }

    debug!(command = %words[0], "Parsing shell line");
    let parsed = ShellLine::try_parse_from(words)
        .map_err(|e| CliError::Parse(e.render().to_string().trim_end().to_string()))?;
    Ok(Some(parsed.command))
}

pub fn help_text() -> String {
    use clap::CommandFactory;
    ShellLine::command()
        .help_template("Commands:\n{subcommands}")
        .render_help()
        .to_string()
}

fn requires_session(command: &ShellCommand) -> bool {
    !matches!(
        command,
        ShellCommand::Signin { .. }
            | ShellCommand::Signup { .. }
            | ShellCommand::Magic { .. }
            | ShellCommand::Code { .. }
            | ShellCommand::Forgot { .. }
            | ShellCommand::Mode { .. }
            | ShellCommand::Help
            | ShellCommand::Quit
    )
}

/// Runs parsed commands against a studio
pub struct Shell {
    studio: Arc<Studio>,
}

impl Shell {
    pub fn new(studio: Arc<Studio>) -> Self {
        Self { studio }
    }

    /// Text shown before the first prompt
    pub async fn greeting(&self) -> String {
        if self.studio.is_signed_in().await {
            let stats = self.studio.tracks.stats().await;
            format!("Welcome back. {}", render::stats(stats))
        } else {
            render::auth_hint(self.studio.auth().await.mode()).to_string()
        }
    }

    /// Parse and run one line
    pub async fn execute(&self, line: &str) -> Result<Outcome> {
        match parse(line)? {
            Some(command) => self.run(command).await,
            None => Ok(Outcome::Output(String::new())),
        }
    }

    pub async fn run(&self, command: ShellCommand) -> Result<Outcome> {
        if requires_session(&command) && !self.studio.is_signed_in().await {
            let hint = render::auth_hint(self.studio.auth().await.mode());
            return Ok(Outcome::Output(format!("Not signed in. {}", hint)));
        }

        let output = match command {
            ShellCommand::Quit => return Ok(Outcome::Quit),
            ShellCommand::Help => help_text(),

            ShellCommand::Signin { email, password } => {
                let step = {
                    let mut auth = self.studio.auth().await;
                    auth.switch_mode(AuthMode::SignIn);
                    auth.set_email(email);
                    auth.set_password(password);
                    auth.sign_in().await?
                };
                self.after_auth(step).await?
            }
            ShellCommand::Signup {
                email,
                password,
                confirm,
            } => {
                let step = {
                    let mut auth = self.studio.auth().await;
                    auth.switch_mode(AuthMode::SignUp);
                    auth.set_email(email);
                    auth.set_password(password);
                    auth.set_confirm_password(confirm);
                    auth.sign_up().await?
                };
                self.after_auth(step).await?
            }
            ShellCommand::Magic { email } => {
                let step = {
                    let mut auth = self.studio.auth().await;
                    auth.switch_mode(AuthMode::Otp);
                    auth.set_email(email);
                    auth.send_code().await?
                };
                self.after_auth(step).await?
            }
            ShellCommand::Code { digits } => {
                let step = {
                    let mut auth = self.studio.auth().await;
                    if auth.mode() != AuthMode::Verify {
                        return Ok(Outcome::Output(
                            "Request a code first: magic <email>".to_string(),
                        ));
                    }
                    if digits.chars().count() != CODE_LENGTH {
                        return Ok(Outcome::Output(format!(
                            "The code has {} digits: code <digits>",
                            CODE_LENGTH
                        )));
                    }
                    let mut step = AuthStep::Ignored;
                    for (index, digit) in digits.chars().enumerate() {
                        step = auth.enter_digit(index, &digit.to_string()).await?;
                    }
                    step
                };
                self.after_auth(step).await?
            }
            ShellCommand::Forgot { email } => {
                let step = {
                    let mut auth = self.studio.auth().await;
                    auth.switch_mode(AuthMode::Forgot);
                    auth.set_email(email);
                    auth.forgot().await?
                };
                self.after_auth(step).await?
            }
            ShellCommand::Mode { mode } => {
                let mode = AuthMode::from(mode);
                self.studio.auth().await.switch_mode(mode);
                render::auth_hint(mode).to_string()
            }
            ShellCommand::Signout => {
                self.studio.sign_out().await?;
                "Signed out.".to_string()
            }

            ShellCommand::Genres => render::genres(&self.studio.genres.genres().await),
            ShellCommand::Genre { action } => self.genre(action).await?,

            ShellCommand::Tracks { query } => {
                let tracks = match query {
                    Some(query) => self.studio.tracks.search(&query).await,
                    None => self.studio.tracks.state().await.tracks,
                };
                render::tracks(&tracks, |track| self.studio.tracks.thumbnail_url(track))
            }
            ShellCommand::Publish {
                title,
                artist,
                audio,
                cover,
                genre,
            } => {
                let audio = match audio {
                    Some(path) => Some(load_media(&path).await?),
                    None => None,
                };
                let thumbnail = match cover {
                    Some(path) => Some(load_media(&path).await?),
                    None => None,
                };
                self.studio
                    .tracks
                    .set_draft(TrackDraft {
                        title,
                        artist,
                        thumbnail,
                        audio,
                        genre_id: genre.map(GenreId::new),
                    })
                    .await;

                let track = self.studio.tracks.publish().await?;
                format!("Published \"{}\" ({})", track.title, track.id)
            }
            ShellCommand::Rm { id } => {
                self.studio.tracks.delete(&TrackId::new(id)).await?;
                "Track deleted.".to_string()
            }

            ShellCommand::Play { id } => {
                let now_playing = self.studio.tracks.play(&TrackId::new(id)).await?;
                format!("Playing {} - {}", now_playing.title, now_playing.artist)
            }
            ShellCommand::Toggle => {
                self.studio.player.toggle_play().await?;
                self.player_line().await
            }
            ShellCommand::Volume { level } => {
                self.studio.player.set_volume(level).await?;
                self.player_line().await
            }
            ShellCommand::Mute => {
                self.studio.player.toggle_mute().await;
                self.player_line().await
            }
            ShellCommand::Seek { fraction } => {
                self.studio.player.seek(fraction).await?;
                self.player_line().await
            }
            ShellCommand::Stop => {
                self.studio.player.close().await;
                "Stopped.".to_string()
            }
            ShellCommand::Status => {
                let stats = self.studio.tracks.stats().await;
                format!("{}\n{}", self.player_line().await, render::stats(stats))
            }
        };

        Ok(Outcome::Output(output))
    }

    async fn genre(&self, action: GenreAction) -> Result<String> {
        let genres = &self.studio.genres;
        match action {
            GenreAction::Add { name } => {
                let genre = genres.quick_add(&name).await?;
                Ok(format!("Added genre {} ({})", genre.name, genre.id))
            }
            GenreAction::Edit { id, name, color } => {
                let mut form = genres.edit(&GenreId::new(id)).await?;
                form.name = name;
                if color.is_some() {
                    form.color = color;
                }
                genres.set_form(form).await;
                let genre = genres.submit().await?;
                Ok(format!("Updated genre {}", genre.name))
            }
            GenreAction::Color { id, color } => {
                let mut form = genres.edit(&GenreId::new(id)).await?;
                form.color = Some(color);
                genres.set_form(form).await;
                let genre = genres.submit().await?;
                Ok(format!(
                    "{} is now {}",
                    genre.name,
                    genre.color.as_deref().unwrap_or("-")
                ))
            }
            GenreAction::Rm { id } => {
                genres.delete(&GenreId::new(id)).await?;
                Ok("Genre deleted.".to_string())
            }
        }
    }

    async fn after_auth(&self, step: AuthStep) -> Result<String> {
        let auth = self.studio.auth().await;
        let banner = auth.banner().map(render::banner);

        let text = match step {
            AuthStep::Ignored => render::auth_hint(auth.mode()).to_string(),
            AuthStep::AwaitingCode => format!(
                "Check {} for a code. {}",
                auth.email(),
                render::auth_hint(auth.mode())
            ),
            AuthStep::ResetRequested => banner.unwrap_or_default(),
            AuthStep::SignedIn(session) => {
                drop(auth);
                self.studio.on_session_changed(Some(&session)).await?;
                let stats = self.studio.tracks.stats().await;
                return Ok(format!(
                    "Signed in as {}. {}",
                    session.user.email.as_deref().unwrap_or("unknown"),
                    render::stats(stats)
                ));
            }
        };
        Ok(text)
    }

    async fn player_line(&self) -> String {
        render::player(self.studio.player.view().await.as_ref())
    }
}
