#![forbid(unsafe_code)]

//! Application shell.
//!
//! [`AppModel`] owns every piece of UI state and every scheduled effect.
//! The host feeds it input through [`AppModel::handle_event`] and time
//! through [`AppModel::tick`], and draws it with [`AppModel::view`]. Both
//! entry points report whether anything visible changed.
//!
//! # Phases
//!
//! ```text
//!  start ──▶ Booting ──(boot complete)──▶ Gallery ◀──▶ Detail
//! ```
//!
//! While booting only the boot sequencer and the cursor blink are live: the
//! background renderer holds no surface and the header typewriter is idle.
//! Entering the gallery activates both.

use std::sync::Arc;
use std::time::Duration;

use vibe_catalog::{Category, CategoryFilter, FilterCache, IconMap, PromptRecord, PromptRepository};
use vibe_core::{Clock, Event, KeyCode, KeyEvent, Keymap, Modifiers, Scheduler, Size, TimerHandle};
use vibe_fx::{
    BackgroundFrame, BackgroundRenderer, BootEvent, BootProgress, BootSequencer, SurfaceProvider,
    Typewriter, TypewriterTick,
};
use vibe_render::Buffer;

use crate::clipboard::ClipboardSink;
use crate::modal::{CopiedRevert, DetailView};
use crate::views;

/// Half-period of the text cursor and badge pulse.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(530);
/// Delay between header characters.
pub const HEADER_CHAR_DELAY: Duration = Duration::from_millis(30);

/// Startup settings for the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Background frame rate.
    pub fps: u32,
    /// Boot jitter seed.
    pub seed: u64,
    /// Start in the gallery.
    pub skip_boot: bool,
    /// Quit on its own after this long.
    pub exit_after: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            seed: 0x5eed,
            skip_boot: false,
            exit_after: None,
        }
    }
}

/// Every payload the shell schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTimer {
    Boot(BootEvent),
    Frame,
    Header(TypewriterTick),
    CopiedRevert(CopiedRevert),
    Blink,
    Exit,
}

impl From<BootEvent> for AppTimer {
    fn from(ev: BootEvent) -> Self {
        Self::Boot(ev)
    }
}

impl From<BackgroundFrame> for AppTimer {
    fn from(_: BackgroundFrame) -> Self {
        Self::Frame
    }
}

impl From<TypewriterTick> for AppTimer {
    fn from(tick: TypewriterTick) -> Self {
        Self::Header(tick)
    }
}

impl From<CopiedRevert> for AppTimer {
    fn from(revert: CopiedRevert) -> Self {
        Self::CopiedRevert(revert)
    }
}

/// Keymap actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    CloseDetail,
    FocusSearch,
    ToggleFocus,
    ShowAll,
}

/// Pane receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sidebar,
    Grid,
}

/// Top-level application state.
pub struct AppModel<C: Clock> {
    repo: Arc<PromptRepository>,
    icons: IconMap,
    clock: C,
    sched: Scheduler<AppTimer>,
    keymap: Keymap<Action>,
    boot: BootSequencer,
    background: BackgroundRenderer<Box<dyn SurfaceProvider>>,
    header: Typewriter,
    clipboard: Box<dyn ClipboardSink>,
    size: Size,
    config: AppConfig,
    started: bool,
    boot_completed: bool,
    category: CategoryFilter,
    query: String,
    cache: FilterCache,
    results: Vec<usize>,
    pane: Pane,
    searching: bool,
    card: usize,
    detail: Option<DetailView>,
    blink_on: bool,
    blink: Option<TimerHandle>,
    quit: bool,
}

impl<C: Clock> AppModel<C> {
    pub fn new(
        repo: Arc<PromptRepository>,
        config: AppConfig,
        clock: C,
        surfaces: Box<dyn SurfaceProvider>,
        clipboard: Box<dyn ClipboardSink>,
        size: Size,
    ) -> Self {
        let mut keymap = Keymap::new();
        keymap.bind(KeyCode::Char('q'), Modifiers::NONE, Action::Quit);
        keymap.bind(KeyCode::Char('c'), Modifiers::CTRL, Action::Quit);
        keymap.bind(KeyCode::Char('/'), Modifiers::NONE, Action::FocusSearch);
        keymap.bind(KeyCode::Tab, Modifiers::NONE, Action::ToggleFocus);
        keymap.bind(KeyCode::BackTab, Modifiers::NONE, Action::ToggleFocus);
        keymap.bind(KeyCode::BackTab, Modifiers::SHIFT, Action::ToggleFocus);
        keymap.bind(KeyCode::Home, Modifiers::NONE, Action::ShowAll);

        Self {
            repo,
            icons: IconMap::new(),
            clock,
            sched: Scheduler::with_fps(config.fps),
            keymap,
            boot: BootSequencer::new(config.seed),
            background: BackgroundRenderer::new(surfaces),
            header: Typewriter::new(Duration::ZERO, HEADER_CHAR_DELAY),
            clipboard,
            size,
            config,
            started: false,
            boot_completed: false,
            category: CategoryFilter::All,
            query: String::new(),
            cache: FilterCache::new(),
            results: Vec::new(),
            pane: Pane::Grid,
            searching: false,
            card: 0,
            detail: None,
            blink_on: true,
            blink: None,
            quit: false,
        }
    }

    /// Kick off the boot sequence (or go straight to the gallery), the
    /// cursor blink, and the exit timer. Only the first call has an effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.sched.advance_to(self.clock.now());
        if self.config.skip_boot {
            self.enter_gallery();
        } else {
            self.boot.start(&mut self.sched);
        }
        self.blink = Some(self.sched.after(BLINK_INTERVAL, AppTimer::Blink));
        if let Some(delay) = self.config.exit_after {
            self.sched.after(delay, AppTimer::Exit);
        }
        tracing::info!(
            prompts = self.repo.len(),
            skip_boot = self.config.skip_boot,
            "vibehub started"
        );
    }

    fn enter_gallery(&mut self) {
        if self.boot_completed {
            return;
        }
        self.boot_completed = true;
        self.background
            .activate(&self.clock, &self.size, &mut self.sched);
        self.refresh_results();
        self.header
            .set_text(&self.category.header_label(), &mut self.sched);
        tracing::info!(status = ?self.background.status(), "gallery ready");
    }

    /// Advance to the current time and apply everything that came due.
    /// Returns `true` if anything visible changed.
    pub fn tick(&mut self) -> bool {
        self.sched.advance_to(self.clock.now());
        let mut dirty = false;
        while let Some(timer) = self.sched.pop_due() {
            dirty |= self.on_timer(timer);
        }
        dirty
    }

    fn on_timer(&mut self, timer: AppTimer) -> bool {
        match timer {
            AppTimer::Boot(ev) => match self.boot.handle(ev, &mut self.sched) {
                Some(BootProgress::LineRevealed(_)) => true,
                Some(BootProgress::Completed) => {
                    self.enter_gallery();
                    true
                }
                None => false,
            },
            AppTimer::Frame => self
                .background
                .on_frame(&self.clock, &self.size, &mut self.sched),
            AppTimer::Header(tick) => self.header.handle(tick, &mut self.sched),
            AppTimer::CopiedRevert(revert) => self
                .detail
                .as_mut()
                .is_some_and(|detail| detail.on_revert(revert)),
            AppTimer::Blink => {
                self.blink_on = !self.blink_on;
                // Relative to delivery: toggles missed during a stall are not replayed.
                self.blink = Some(self.sched.after(BLINK_INTERVAL, AppTimer::Blink));
                true
            }
            AppTimer::Exit => {
                tracing::info!("exit timer elapsed");
                self.quit = true;
                true
            }
        }
    }

    /// Time until the next scheduled effect, if any.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.sched.time_until_next(self.clock.now())
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.sched.frame_interval()
    }

    /// Apply one input event. Returns `true` if anything visible changed.
    pub fn handle_event(&mut self, event: Event) -> bool {
        self.sched.advance_to(self.clock.now());
        match event {
            Event::Resize { width, height } => {
                self.size = Size::new(width, height);
                if let Some(detail) = self.detail.as_mut() {
                    let record = &self.repo.get_all()[detail.record()];
                    detail.clamp_scroll(views::detail::max_scroll(self.size, record));
                }
                true
            }
            Event::Paste(text) => {
                if !self.searching || self.detail.is_some() {
                    return false;
                }
                let mut query = self.query.clone();
                query.extend(text.chars().filter(|c| !c.is_control()));
                self.set_search(&query);
                true
            }
            Event::Focus(_) => false,
            Event::Key(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let action = self.keymap.resolve(&key);
        if !self.boot_completed {
            if action == Some(Action::Quit) {
                self.quit = true;
            }
            return false;
        }
        if self.detail.is_some() {
            return self.handle_detail_key(key, action);
        }
        if self.searching {
            return self.handle_search_key(key);
        }
        match action {
            Some(Action::Quit) => {
                self.quit = true;
                return false;
            }
            Some(Action::FocusSearch) => {
                self.searching = true;
                return true;
            }
            Some(Action::ToggleFocus) => {
                self.pane = match self.pane {
                    Pane::Sidebar => Pane::Grid,
                    Pane::Grid => Pane::Sidebar,
                };
                return true;
            }
            Some(Action::ShowAll) => return self.select_category(CategoryFilter::All),
            Some(Action::CloseDetail) | None => {}
        }
        match self.pane {
            Pane::Sidebar => self.handle_sidebar_key(key),
            Pane::Grid => self.handle_grid_key(key),
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent, action: Option<Action>) -> bool {
        match action {
            Some(Action::CloseDetail) => return self.close_detail(),
            Some(Action::Quit) => {
                self.quit = true;
                return false;
            }
            _ => {}
        }
        match key.code {
            KeyCode::Char('x') => return self.close_detail(),
            KeyCode::Char('c' | 'y') if !key.ctrl() => {
                self.copy_open_prompt();
                return true;
            }
            _ => {}
        }
        let page = isize::try_from(self.size.height / 2).map_or(1, |p| p.max(1));
        let Some(detail) = self.detail.as_mut() else {
            return false;
        };
        let max = views::detail::max_scroll(self.size, &self.repo.get_all()[detail.record()]);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => detail.scroll_by(-1, max),
            KeyCode::Down | KeyCode::Char('j') => detail.scroll_by(1, max),
            KeyCode::PageUp => detail.scroll_by(-page, max),
            KeyCode::PageDown | KeyCode::Char(' ') => detail.scroll_by(page, max),
            KeyCode::Home => detail.scroll_by(isize::MIN, max),
            KeyCode::End => detail.scroll_by(isize::MAX, max),
            _ => false,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.ctrl() => {
                self.quit = true;
                false
            }
            KeyCode::Char('u') if key.ctrl() => {
                self.set_search("");
                true
            }
            KeyCode::Enter | KeyCode::Escape | KeyCode::Tab => {
                self.searching = false;
                self.pane = Pane::Grid;
                true
            }
            KeyCode::Backspace => {
                let mut query = self.query.clone();
                if query.pop().is_none() {
                    return false;
                }
                self.set_search(&query);
                true
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER) =>
            {
                let mut query = self.query.clone();
                query.push(c);
                self.set_search(&query);
                true
            }
            _ => false,
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) -> bool {
        let entries = Category::ALL.len() + 1;
        let current = sidebar_index(self.category);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                let next = current.checked_sub(1).unwrap_or(entries - 1);
                self.select_category(sidebar_entry(next))
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_category(sidebar_entry((current + 1) % entries))
            }
            KeyCode::Right | KeyCode::Enter => {
                self.pane = Pane::Grid;
                true
            }
            _ => false,
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) -> bool {
        let len = self.results.len();
        if len == 0 {
            if key.code == KeyCode::Left {
                self.pane = Pane::Sidebar;
                return true;
            }
            return false;
        }
        let cols = views::gallery::columns(self.size);
        let card = self.card;
        let next = match key.code {
            KeyCode::Enter => return self.open_selected(),
            KeyCode::Left | KeyCode::Char('h') => {
                if card % cols == 0 {
                    self.pane = Pane::Sidebar;
                    return true;
                }
                card - 1
            }
            KeyCode::Right | KeyCode::Char('l') => (card + 1).min(len - 1),
            KeyCode::Up | KeyCode::Char('k') => card.saturating_sub(cols),
            KeyCode::Down | KeyCode::Char('j') => {
                if card + cols < len {
                    card + cols
                } else {
                    card
                }
            }
            KeyCode::PageUp => card.saturating_sub(cols * 3),
            KeyCode::PageDown => (card + cols * 3).min(len - 1),
            KeyCode::End => len - 1,
            _ => return false,
        };
        self.card = next;
        next != card
    }

    /// Show only `category` (or everything). Returns `true` if it changed.
    pub fn select_category(&mut self, category: impl Into<CategoryFilter>) -> bool {
        let category = category.into();
        if category == self.category {
            return false;
        }
        tracing::debug!(?category, "category selected");
        self.category = category;
        self.card = 0;
        self.refresh_results();
        if self.boot_completed {
            self.header
                .set_text(&self.category.header_label(), &mut self.sched);
        }
        true
    }

    /// Replace the search query.
    pub fn set_search(&mut self, query: &str) {
        if query == self.query {
            return;
        }
        self.query.clear();
        self.query.push_str(query);
        self.refresh_results();
    }

    fn refresh_results(&mut self) {
        let indices = self
            .cache
            .get(self.repo.get_all(), self.category, &self.query);
        self.results.clear();
        self.results.extend_from_slice(indices);
        self.card = match self.results.len() {
            0 => 0,
            n => self.card.min(n - 1),
        };
    }

    /// Open the detail view over the record with `id`. Any open detail view
    /// is closed first. Returns `false` if no such record exists.
    pub fn open_prompt_detail(&mut self, id: &str) -> bool {
        let Some(index) = self.repo.get_all().iter().position(|r| r.id == id) else {
            return false;
        };
        self.close_detail();
        self.detail = Some(DetailView::open(
            index,
            &mut self.keymap,
            Action::CloseDetail,
        ));
        tracing::debug!(id, "detail view opened");
        true
    }

    fn open_selected(&mut self) -> bool {
        let Some(&index) = self.results.get(self.card) else {
            return false;
        };
        let id = self.repo.get_all()[index].id.clone();
        self.open_prompt_detail(&id)
    }

    /// Close the detail view. Returns `false` if none was open.
    pub fn close_detail(&mut self) -> bool {
        match self.detail.take() {
            Some(detail) => {
                detail.close(&mut self.keymap, &mut self.sched);
                true
            }
            None => false,
        }
    }

    /// Copy the open prompt's body. Does nothing without a detail view.
    pub fn copy_open_prompt(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            let record = &self.repo.get_all()[detail.record()];
            detail.copy(record, self.clipboard.as_mut(), &mut self.sched);
        }
    }

    /// Cancel every outstanding effect and release the background surface.
    pub fn shutdown(&mut self) {
        self.close_detail();
        self.boot.teardown(&mut self.sched);
        self.background.deactivate(&mut self.sched);
        self.header.teardown(&mut self.sched);
        if let Some(handle) = self.blink.take() {
            self.sched.cancel(handle);
        }
        self.sched.cancel_all();
        tracing::info!(
            frames = self.background.frames_rendered(),
            "vibehub shut down"
        );
    }

    /// Draw the current state into `buf`, resizing it to the viewport.
    pub fn view(&self, buf: &mut Buffer) {
        views::render(self, buf);
    }

    // --- read access for views and tests ---

    #[must_use]
    pub fn repository(&self) -> &PromptRepository {
        &self.repo
    }

    #[must_use]
    pub fn icons(&self) -> &IconMap {
        &self.icons
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn boot_completed(&self) -> bool {
        self.boot_completed
    }

    #[must_use]
    pub const fn boot(&self) -> &BootSequencer {
        &self.boot
    }

    #[must_use]
    pub fn background(&self) -> &BackgroundRenderer<Box<dyn SurfaceProvider>> {
        &self.background
    }

    #[must_use]
    pub const fn header(&self) -> &Typewriter {
        &self.header
    }

    #[must_use]
    pub const fn selected_category(&self) -> CategoryFilter {
        self.category
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.query
    }

    /// Records passing the current filter, in catalog order.
    pub fn results(&self) -> impl ExactSizeIterator<Item = &PromptRecord> + '_ {
        let all = self.repo.get_all();
        self.results.iter().map(move |&i| &all[i])
    }

    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Index of the selected card within the results.
    #[must_use]
    pub const fn selected_card(&self) -> usize {
        self.card
    }

    #[must_use]
    pub const fn pane(&self) -> Pane {
        self.pane
    }

    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// The open detail view and the record it shows.
    #[must_use]
    pub fn open_detail(&self) -> Option<(&DetailView, &PromptRecord)> {
        self.detail
            .as_ref()
            .map(|d| (d, &self.repo.get_all()[d.record()]))
    }

    #[must_use]
    pub const fn blink_on(&self) -> bool {
        self.blink_on
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }

    #[must_use]
    pub const fn keymap(&self) -> &Keymap<Action> {
        &self.keymap
    }

    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler<AppTimer> {
        &self.sched
    }
}

/// Sidebar row of a filter: 0 for all, then categories in display order.
#[must_use]
pub fn sidebar_index(filter: CategoryFilter) -> usize {
    match filter {
        CategoryFilter::All => 0,
        CategoryFilter::Only(c) => Category::ALL.iter().position(|&x| x == c).map_or(0, |i| i + 1),
    }
}

/// Filter shown at sidebar row `index`.
#[must_use]
pub fn sidebar_entry(index: usize) -> CategoryFilter {
    match index {
        0 => CategoryFilter::All,
        i => Category::ALL
            .get(i - 1)
            .copied()
            .map_or(CategoryFilter::All, CategoryFilter::Only),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::RecordingClipboard;
    use vibe_core::ManualClock;
    use vibe_fx::{CpuSurfaceProvider, RendererStatus, UnavailableSurfaceProvider};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    fn ch(c: char) -> Event {
        key(KeyCode::Char(c))
    }

    struct Harness {
        clock: ManualClock,
        clip: RecordingClipboard,
        app: AppModel<ManualClock>,
    }

    impl Harness {
        fn new(skip_boot: bool) -> Self {
            Self::with_surfaces(skip_boot, Box::new(CpuSurfaceProvider::new()))
        }

        fn with_surfaces(skip_boot: bool, surfaces: Box<dyn SurfaceProvider>) -> Self {
            let clock = ManualClock::new();
            let clip = RecordingClipboard::new();
            let repo = Arc::new(PromptRepository::builtin().expect("builtin catalog"));
            let config = AppConfig {
                skip_boot,
                ..AppConfig::default()
            };
            let mut app = AppModel::new(
                repo,
                config,
                clock.clone(),
                surfaces,
                Box::new(clip.clone()),
                Size::new(120, 40),
            );
            app.start();
            app.tick();
            Self { clock, clip, app }
        }

        /// Step the clock in 10ms increments, ticking after each step.
        fn advance(&mut self, d: Duration) {
            let step = ms(10);
            let mut left = d;
            while left > Duration::ZERO {
                let dt = left.min(step);
                self.clock.advance(dt);
                self.app.tick();
                left -= dt;
            }
        }

        fn send(&mut self, ev: Event) -> bool {
            let dirty = self.app.handle_event(ev);
            self.app.tick();
            dirty
        }
    }

    #[test]
    fn boot_gates_the_gallery() {
        let mut h = Harness::new(false);
        assert!(!h.app.boot_completed());
        assert_eq!(h.app.background().status(), &RendererStatus::Inactive);
        assert!(h.app.background().surface().is_none());
        assert_eq!(h.app.header().text(), "");

        h.advance(ms(7 * 400 + 800));
        assert!(h.app.boot_completed());
        assert!(h.app.background().is_running());
        assert_eq!(h.app.header().text(), "ROOT_ACCESS");
    }

    #[test]
    fn keys_are_ignored_while_booting() {
        let mut h = Harness::new(false);
        assert!(!h.send(ch('/')));
        assert!(!h.app.is_searching());
        h.send(ch('q'));
        assert!(h.app.should_quit());
    }

    #[test]
    fn skip_boot_starts_in_gallery() {
        let h = Harness::new(true);
        assert!(h.app.boot_completed());
        assert_eq!(h.app.result_count(), h.app.repository().len());
        assert_eq!(h.app.selected_category(), CategoryFilter::All);
        assert_eq!(h.app.search_query(), "");
        assert!(h.app.open_detail().is_none());
    }

    #[test]
    fn select_category_filters_and_retypes_header() {
        let mut h = Harness::new(true);
        h.advance(ms(1_000));
        assert_eq!(h.app.header().visible(), "ROOT_ACCESS");

        assert!(h.app.select_category(Category::Shaders));
        assert!(!h.app.select_category(Category::Shaders));
        assert_eq!(h.app.header().visible(), "");
        assert!(h.app.results().all(|r| r.category == Category::Shaders));
        h.advance(ms(1_000));
        assert_eq!(h.app.header().visible(), "SHADERS");
    }

    #[test]
    fn search_typing_and_clearing() {
        let mut h = Harness::new(true);
        h.send(ch('/'));
        assert!(h.app.is_searching());
        for c in "zzzz-nothing".chars() {
            h.send(ch(c));
        }
        assert_eq!(h.app.search_query(), "zzzz-nothing");
        assert_eq!(h.app.result_count(), 0);

        h.send(Event::Key(
            KeyEvent::new(KeyCode::Char('u')).with_modifiers(Modifiers::CTRL),
        ));
        assert_eq!(h.app.search_query(), "");
        assert_eq!(h.app.result_count(), h.app.repository().len());

        h.send(ch('q'));
        assert!(!h.app.should_quit());
        assert_eq!(h.app.search_query(), "q");
        h.send(key(KeyCode::Backspace));
        h.send(key(KeyCode::Escape));
        assert!(!h.app.is_searching());
        assert_eq!(h.app.search_query(), "");
    }

    #[test]
    fn paste_goes_to_search_only_while_searching() {
        let mut h = Harness::new(true);
        assert!(!h.send(Event::Paste("shader".into())));
        h.send(ch('/'));
        h.send(Event::Paste("sha\nder".into()));
        assert_eq!(h.app.search_query(), "shader");
    }

    #[test]
    fn selection_is_clamped_when_results_shrink() {
        let mut h = Harness::new(true);
        h.send(key(KeyCode::End));
        assert_eq!(h.app.selected_card(), h.app.repository().len() - 1);
        h.app.select_category(Category::Python);
        assert_eq!(h.app.selected_card(), 0);
        h.send(key(KeyCode::End));
        let last = h.app.result_count() - 1;
        assert_eq!(h.app.selected_card(), last);
        h.app.set_search("zzzz");
        assert_eq!(h.app.selected_card(), 0);
    }

    #[test]
    fn sidebar_navigation_applies_category() {
        let mut h = Harness::new(true);
        h.send(key(KeyCode::Tab));
        assert_eq!(h.app.pane(), Pane::Sidebar);
        h.send(key(KeyCode::Down));
        assert_eq!(
            h.app.selected_category(),
            CategoryFilter::Only(Category::WebDesign)
        );
        h.send(key(KeyCode::Up));
        h.send(key(KeyCode::Up));
        assert_eq!(
            h.app.selected_category(),
            CategoryFilter::Only(Category::AiTools)
        );
        h.send(key(KeyCode::Home));
        assert_eq!(h.app.selected_category(), CategoryFilter::All);
    }

    #[test]
    fn modal_open_and_close() {
        let mut h = Harness::new(true);
        assert!(h.send(key(KeyCode::Enter)));
        let (_, record) = h.app.open_detail().expect("detail open");
        assert_eq!(record.id, h.app.repository().get_all()[0].id);

        assert!(h.send(ch('x')));
        assert!(h.app.open_detail().is_none());
        assert!(h.app.keymap().resolve(&KeyEvent::new(KeyCode::Escape)).is_none());
    }

    #[test]
    fn page_keys_scroll_by_half_the_screen() {
        let mut h = Harness::new(true);
        h.send(Event::Resize {
            width: 60,
            height: 14,
        });
        assert!(h.send(key(KeyCode::Enter)));
        let max = {
            let (_, record) = h.app.open_detail().expect("detail open");
            views::detail::max_scroll(h.app.size(), record)
        };
        assert!(max > 0);

        h.send(key(KeyCode::PageDown));
        let (detail, _) = h.app.open_detail().expect("detail open");
        assert_eq!(detail.scroll(), max.min(7));
        h.send(key(KeyCode::PageUp));
        let (detail, _) = h.app.open_detail().expect("detail open");
        assert_eq!(detail.scroll(), 0);
    }

    #[test]
    fn escape_closes_and_is_inert_afterwards() {
        let mut h = Harness::new(true);
        let id = h.app.repository().get_all()[3].id.clone();
        assert!(h.app.open_prompt_detail(&id));
        let bindings = h.app.keymap().len();

        assert!(h.send(key(KeyCode::Escape)));
        assert!(h.app.open_detail().is_none());
        assert_eq!(h.app.keymap().len(), bindings - 1);

        assert!(!h.send(key(KeyCode::Escape)));
        assert!(h.app.open_detail().is_none());
        assert!(!h.app.should_quit());
    }

    #[test]
    fn reopening_replaces_the_escape_binding() {
        let mut h = Harness::new(true);
        let ids: Vec<String> = h.app.repository().get_all()[..2]
            .iter()
            .map(|r| r.id.clone())
            .collect();
        let base = h.app.keymap().len();
        h.app.open_prompt_detail(&ids[0]);
        h.app.open_prompt_detail(&ids[1]);
        assert_eq!(h.app.keymap().len(), base + 1);
        assert!(!h.app.open_prompt_detail("no-such-id"));
    }

    #[test]
    fn copy_acknowledges_then_reverts() {
        let mut h = Harness::new(true);
        h.send(key(KeyCode::Enter));
        h.send(ch('c'));
        let code = h.app.open_detail().map(|(_, r)| r.code.clone());
        assert_eq!(h.clip.writes(), vec![code.expect("record")]);
        assert!(h.app.open_detail().is_some_and(|(d, _)| d.is_copied()));

        h.advance(ms(1_999));
        assert!(h.app.open_detail().is_some_and(|(d, _)| d.is_copied()));
        h.advance(ms(1));
        assert!(h.app.open_detail().is_some_and(|(d, _)| !d.is_copied()));
    }

    #[test]
    fn closing_detail_cancels_copied_revert() {
        let mut h = Harness::new(true);
        h.send(key(KeyCode::Enter));
        h.send(ch('y'));
        let before = h.app.scheduler().pending_timers();
        h.send(ch('x'));
        assert_eq!(h.app.scheduler().pending_timers(), before - 1);
    }

    #[test]
    fn unavailable_surface_degrades_without_error() {
        let h = Harness::with_surfaces(true, Box::new(UnavailableSurfaceProvider));
        assert!(matches!(
            h.app.background().status(),
            RendererStatus::Degraded(_)
        ));
        assert!(h.app.boot_completed());
    }

    #[test]
    fn exit_timer_quits() {
        let clock = ManualClock::new();
        let repo = Arc::new(PromptRepository::builtin().expect("builtin catalog"));
        let config = AppConfig {
            exit_after: Some(ms(500)),
            ..AppConfig::default()
        };
        let mut app = AppModel::new(
            repo,
            config,
            clock.clone(),
            Box::new(UnavailableSurfaceProvider),
            Box::new(RecordingClipboard::new()),
            Size::new(80, 24),
        );
        app.start();
        clock.advance(ms(499));
        app.tick();
        assert!(!app.should_quit());
        clock.advance(ms(1));
        app.tick();
        assert!(app.should_quit());
    }

    #[test]
    fn shutdown_leaves_nothing_scheduled() {
        let mut h = Harness::new(true);
        h.send(key(KeyCode::Enter));
        h.send(ch('c'));
        h.app.shutdown();
        assert!(h.app.scheduler().is_idle());
        assert_eq!(h.app.background().status(), &RendererStatus::Inactive);
    }

    #[test]
    fn sidebar_rows_round_trip() {
        for i in 0..=Category::ALL.len() {
            assert_eq!(sidebar_index(sidebar_entry(i)), i);
        }
    }
}
