//! Game-mode state machine
//!
//! `GameApp` owns the top-level mode, the current level session and the
//! in-flight level load, and orchestrates the collaborators around them.
//! It is assembled once at startup through [`GameAppBuilder`]; a missing
//! collaborator refuses construction outright, because nothing downstream
//! can limp along without one.
//!
//! Mode diagram:
//!
//! ```text
//! MainMenu <-> SettingsMenu
//! MainMenu <-> LevelSelection -> Playing (unlock-gated)
//! Playing <-> Paused
//! Playing -> LevelSelection (completion)
//! Playing -> Playing (restart / stroke exhaustion, fresh session)
//! ```

use crate::error::ConfigError;
use crate::levels::LevelCatalog;
use crate::progress::Progression;

use super::ports::{AudioSink, CameraRig, LevelLoader, LoadPoll, Presentation};
use super::session::{LevelSession, SessionEvent};
use super::shot::FrameInput;

/// Top-level application mode; exactly one is active at any instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    MainMenu,
    SettingsMenu,
    LevelSelection,
    Playing,
    Paused,
}

/// Builder for [`GameApp`]; all collaborators are required.
#[derive(Default)]
pub struct GameAppBuilder {
    progression: Option<Progression>,
    catalog: Option<LevelCatalog>,
    presentation: Option<Box<dyn Presentation>>,
    audio: Option<Box<dyn AudioSink>>,
    camera: Option<Box<dyn CameraRig>>,
    loader: Option<Box<dyn LevelLoader>>,
}

impl GameAppBuilder {
    pub fn progression(mut self, progression: Progression) -> Self {
        self.progression = Some(progression);
        self
    }

    /// Level catalog; defaults to the built-in course when not supplied
    pub fn catalog(mut self, catalog: LevelCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn presentation(mut self, presentation: Box<dyn Presentation>) -> Self {
        self.presentation = Some(presentation);
        self
    }

    pub fn audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn camera(mut self, camera: Box<dyn CameraRig>) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn loader(mut self, loader: Box<dyn LevelLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Validate the wiring and assemble the app in the main menu, with the
    /// stored volume settings applied to the audio sink.
    pub fn build(self) -> Result<GameApp, ConfigError> {
        let progression = self
            .progression
            .ok_or(ConfigError::MissingCollaborator("progression"))?;
        let mut presentation = self
            .presentation
            .ok_or(ConfigError::MissingCollaborator("presentation"))?;
        let mut audio = self
            .audio
            .ok_or(ConfigError::MissingCollaborator("audio"))?;
        let camera = self
            .camera
            .ok_or(ConfigError::MissingCollaborator("camera rig"))?;
        let loader = self
            .loader
            .ok_or(ConfigError::MissingCollaborator("level loader"))?;
        let catalog = self.catalog.unwrap_or_default();
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }

        audio.set_music_volume(progression.record().music_volume);
        audio.set_sfx_volume(progression.record().sfx_volume);
        presentation.show_main_menu();
        log::info!(
            "Game assembled: {} levels, unlocked through {}",
            catalog.len(),
            progression.unlocked_level()
        );

        Ok(GameApp {
            mode: GameMode::MainMenu,
            current_level: 0,
            time_scale: 1.0,
            loading: false,
            session: None,
            progression,
            catalog,
            presentation,
            audio,
            camera,
            loader,
        })
    }
}

/// The game: mode state machine, tick drivers and collaborator orchestration.
pub struct GameApp {
    mode: GameMode,
    current_level: usize,
    /// Global simulation time multiplier; 0.0 while paused
    time_scale: f32,
    loading: bool,
    session: Option<LevelSession>,
    progression: Progression,
    catalog: LevelCatalog,
    presentation: Box<dyn Presentation>,
    audio: Box<dyn AudioSink>,
    camera: Box<dyn CameraRig>,
    loader: Box<dyn LevelLoader>,
}

impl GameApp {
    pub fn builder() -> GameAppBuilder {
        GameAppBuilder::default()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn session(&self) -> Option<&LevelSession> {
        self.session.as_ref()
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    // === Mode transitions ===

    /// Enter a level. Rejected (logged no-op) when the level is locked or
    /// does not exist; mode and current level are left untouched.
    pub fn start_game(&mut self, level_index: usize) {
        if self.catalog.get(level_index).is_none() {
            log::warn!("start_game rejected: no level {level_index}");
            return;
        }
        if !self.progression.is_unlocked(level_index) {
            log::warn!(
                "start_game rejected: level {level_index} is locked (unlocked through {})",
                self.progression.unlocked_level()
            );
            return;
        }

        self.dispose_session();
        self.mode = GameMode::Playing;
        self.time_scale = 1.0;
        self.current_level = level_index;
        self.begin_load();
    }

    /// Unconditional transition to the main menu, dropping any live attempt
    pub fn return_to_main_menu(&mut self) {
        self.dispose_session();
        self.time_scale = 1.0;
        self.mode = GameMode::MainMenu;
        self.presentation.show_main_menu();
    }

    pub fn open_settings(&mut self) {
        self.mode = GameMode::SettingsMenu;
        self.presentation.show_settings();
    }

    /// Unconditional transition to level selection; refreshes every level's
    /// lock indicator from the progression watermark
    pub fn open_level_selection(&mut self) {
        self.dispose_session();
        self.time_scale = 1.0;
        self.mode = GameMode::LevelSelection;
        self.presentation.show_level_selection();
        for index in 0..self.catalog.len() {
            self.presentation
                .set_level_lock(index, self.progression.is_unlocked(index));
        }
    }

    /// Playing -> Paused. Freezes simulation time; menu input stays live
    /// because it rides the frame tick.
    pub fn pause_game(&mut self) {
        if self.mode != GameMode::Playing {
            log::debug!("pause_game ignored in mode {:?}", self.mode);
            return;
        }
        self.mode = GameMode::Paused;
        self.time_scale = 0.0;
        self.presentation.show_pause_menu();
    }

    /// Paused -> Playing
    pub fn resume_game(&mut self) {
        if self.mode != GameMode::Paused {
            log::debug!("resume_game ignored in mode {:?}", self.mode);
            return;
        }
        self.mode = GameMode::Playing;
        self.time_scale = 1.0;
        self.presentation.hide_pause_menu();
    }

    /// Reload the current level from scratch (fresh shot state). Legal from
    /// Playing or Paused only.
    pub fn restart_level(&mut self) {
        if !matches!(self.mode, GameMode::Playing | GameMode::Paused) {
            log::debug!("restart_level ignored in mode {:?}", self.mode);
            return;
        }
        if self.mode == GameMode::Paused {
            self.presentation.hide_pause_menu();
        }
        self.dispose_session();
        self.mode = GameMode::Playing;
        self.time_scale = 1.0;
        self.begin_load();
    }

    // === Settings ===

    pub fn set_music_volume(&mut self, volume: f32) {
        let clamped = self.progression.set_music_volume(volume);
        self.audio.set_music_volume(clamped);
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        let clamped = self.progression.set_sfx_volume(volume);
        self.audio.set_sfx_volume(clamped);
    }

    // === Tick drivers ===

    /// Variable-rate frame tick: load polling, input capture, settle delay.
    pub fn frame(&mut self, input: &FrameInput, dt: f32) {
        if self.loading {
            self.poll_load();
        }

        if self.mode != GameMode::Playing {
            return;
        }
        let scaled = dt * self.time_scale;
        let event = match &mut self.session {
            Some(session) => session.frame(
                input,
                scaled,
                &mut *self.camera,
                &mut *self.presentation,
                &mut *self.audio,
            ),
            None => None,
        };
        if let Some(event) = event {
            self.handle_session_event(event);
        }
    }

    /// Fixed-rate simulation tick: physics, triggers, rest checks. Inert
    /// unless a level is actively playing and time is flowing.
    pub fn fixed_step(&mut self, dt: f32) {
        if self.mode != GameMode::Playing {
            return;
        }
        let scaled = dt * self.time_scale;
        if scaled <= 0.0 {
            return;
        }
        let event = match &mut self.session {
            Some(session) => session.fixed_step(scaled, &mut *self.audio),
            None => None,
        };
        if let Some(event) = event {
            self.handle_session_event(event);
        }
    }

    /// Flush persistent state; call once on process exit
    pub fn shutdown(&mut self) {
        self.progression.flush();
    }

    // === Internals ===

    fn begin_load(&mut self) {
        // Only reachable with a valid current_level; start_game and
        // restart_level both check the catalog first
        let Some(level) = self.catalog.get(self.current_level) else {
            log::error!("begin_load with invalid level {}", self.current_level);
            return;
        };
        log::info!("Loading level {} ({})", self.current_level, level.name);
        self.loader.begin(level);
        self.loading = true;
        self.presentation.show_loading_screen(0.0);
    }

    fn poll_load(&mut self) {
        match self.loader.poll() {
            LoadPoll::Pending(progress) => {
                self.presentation
                    .show_loading_screen(progress.clamp(0.0, 1.0));
            }
            LoadPoll::Ready(body) => {
                self.loading = false;
                self.presentation.hide_loading_screen();
                let Some(level) = self.catalog.get(self.current_level) else {
                    log::error!("Load finished for invalid level {}", self.current_level);
                    return;
                };
                self.presentation.show_hud();
                self.presentation.update_level_number(self.current_level);
                self.presentation.update_stroke_count(0);
                self.session = Some(LevelSession::new(self.current_level, level, body));
                log::info!("Level {} ready", self.current_level);
            }
        }
    }

    fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::StrokeLimitReached => self.restart_level(),
            SessionEvent::Completed => self.level_completed(),
        }
    }

    /// Ball reached the hole and settled: advance progression, persist and
    /// fall back to level selection
    fn level_completed(&mut self) {
        self.progression
            .unlock_next(self.current_level, self.catalog.len());
        self.open_level_selection();
    }

    /// Tear down the live attempt and any in-flight load. Cancelling here is
    /// what guarantees a pending settle delay or load can never outlive the
    /// attempt that scheduled it.
    fn dispose_session(&mut self) {
        if self.loading {
            self.loader.cancel();
            self.loading = false;
            self.presentation.hide_loading_screen();
        }
        if let Some(session) = self.session.take() {
            log::debug!("Disposed session for level {}", session.level_index());
        }
        // A drag may have been mid-flight; never leave the camera dead
        self.camera.set_orbit_input_enabled(true);
    }
}
