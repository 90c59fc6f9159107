//! The mode dispatcher.
//!
//! [`VimEngine`] owns the [`VimState`], lexes every key into a
//! [`VimCommand`] and interprets the command against a [`TextHost`]. Nothing
//! fails past [`VimEngine::handle`]: errors become transient status messages.

use crossterm::event::KeyCode;

use crate::command::{InsertKind, VimCommand};
use crate::command_line::{ExCommand, ExCommandRegistry};
use crate::config::VimConfig;
use crate::error::{Result, VimError};
use crate::host::{TextBuffer, TextHost};
use crate::key::{InputEvent, KeyInput};
use crate::key_handler::KeyResult;
use crate::mode::VimMode;
use crate::motion::{screen_line, Motion};
use crate::operator::{self, Operator, OperatorExecutor, OperatorSpan};
use crate::position::{Position, Range};
use crate::registers::RegisterStore;
use crate::search::{self, build_regex, whole_word_pattern, word_under_cursor, LastSearch};
use crate::state::{EditAction, EditTarget, LastEdit, VimState};
use crate::status::{EngineStatus, StatusMessage};
use crate::text_object::{TextObject, TextObjectModifier};

/// Vim-style modal input engine for one editing session.
///
/// The host forwards every input event to [`handle`](Self::handle) and
/// suppresses its own default handling whenever it returns `true`.
#[derive(Debug)]
pub struct VimEngine {
    state: VimState,
    config: VimConfig,
    commands: ExCommandRegistry,
    enabled: bool,
    message: Option<StatusMessage>,
    /// Nesting of macro playback. Keys fed during playback are not recorded.
    replay_depth: usize,
    /// Playback hit the depth limit; every enclosing playback stops.
    macro_aborted: bool,
}

impl Default for VimEngine {
    fn default() -> Self {
        Self::new(VimConfig::default())
    }
}

impl VimEngine {
    pub fn new(config: VimConfig) -> Self {
        Self {
            state: VimState::new(&config),
            config,
            commands: ExCommandRegistry::new(),
            enabled: true,
            message: None,
            replay_depth: 0,
            macro_aborted: false,
        }
    }

    // =========================================================================
    // Host-facing API
    // =========================================================================

    pub fn mode(&self) -> VimMode {
        self.state.mode
    }

    pub fn state(&self) -> &VimState {
        &self.state
    }

    pub fn config(&self) -> &VimConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn modal editing on or off. Turning it off discards all modal state.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            if self.enabled {
                tracing::debug!("modal editing disabled, resetting state");
            }
            self.state = VimState::new(&self.config);
            self.message = None;
            self.replay_depth = 0;
            self.macro_aborted = false;
        }
        self.enabled = enabled;
    }

    /// Register a named ex command (`:w`, `:q`, ...).
    pub fn register_command(
        &mut self,
        name: impl Into<String>,
        handler: impl FnMut(&str) -> Result<()> + 'static,
    ) {
        self.commands.register(name, handler);
    }

    pub fn commands(&self) -> &ExCommandRegistry {
        &self.commands
    }

    /// The command line being typed, including its prefix, while in COMMAND mode.
    pub fn command_line(&self) -> Option<&str> {
        (self.state.mode == VimMode::Command).then_some(self.state.command_line.as_str())
    }

    /// The latest transient message, removing it.
    pub fn take_message(&mut self) -> Option<StatusMessage> {
        self.message.take()
    }

    /// Everything a status bar shows.
    pub fn status(&self) -> EngineStatus {
        let recording = self.state.macros.recording();
        EngineStatus {
            mode: self.state.mode,
            mode_label: EngineStatus::label_for(self.state.mode, recording),
            mode_code: self.state.mode.short_code().to_string(),
            pending_keys: self.state.pending_keys.clone(),
            command_line: self.command_line().map(str::to_string),
            recording,
            message: self.message.clone(),
        }
    }

    /// Handle one input event. Returns true when the host must suppress its
    /// default handling.
    pub fn handle<H: TextHost + ?Sized>(&mut self, event: &InputEvent, host: &mut H) -> bool {
        if !self.enabled {
            return false;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(*key, host),
            InputEvent::CompositionStart | InputEvent::CompositionUpdate(_) => {
                !self.accepts_raw_text()
            }
            InputEvent::CompositionEnd(text) => self.finish_composition(text, host),
        }
    }

    /// Handle one key press. Returns true when the key was consumed.
    pub fn handle_key<H: TextHost + ?Sized>(&mut self, key: KeyInput, host: &mut H) -> bool {
        if !self.enabled {
            return false;
        }
        tracing::trace!(key = %key, mode = %self.state.mode, "key");

        if self.replay_depth == 0 && self.state.macros.is_recording() {
            self.state.macros.record(key);
        }
        if key.is_arrow() {
            return false;
        }

        match self.state.lex_key(&key) {
            KeyResult::Command(command) => {
                self.execute(command, host);
                true
            }
            KeyResult::Pending | KeyResult::Consumed => true,
            KeyResult::PassThrough => {
                self.capture_typed(&key);
                false
            }
        }
    }

    /// Dispatch keys as if typed, applying the host's default handling to keys
    /// the engine does not consume. Used for macro playback.
    pub fn feed_keys<H: TextHost + ?Sized>(&mut self, keys: &[KeyInput], host: &mut H) {
        for key in keys {
            if self.macro_aborted {
                break;
            }
            if !self.handle_key(*key, host) {
                host.apply_default_key(key);
            }
        }
    }

    // =========================================================================
    // Raw text
    // =========================================================================

    /// Raw text is wanted in INSERT, REPLACE, or by a command awaiting a character.
    fn accepts_raw_text(&self) -> bool {
        matches!(self.state.mode, VimMode::Insert | VimMode::Replace)
            || self.state.pending_char.is_some()
    }

    fn finish_composition<H: TextHost + ?Sized>(&mut self, text: &str, host: &mut H) -> bool {
        match self.state.mode {
            VimMode::Insert => {
                if self.replay_depth == 0 && self.state.macros.is_recording() {
                    for c in text.chars() {
                        self.state.macros.record(KeyInput::char(c));
                    }
                }
                if let Some(edit) = self.state.last_edit.as_mut().filter(|e| e.recording) {
                    edit.inserted.push_str(text);
                }
                false
            }
            _ if self.accepts_raw_text() => {
                // The host already inserted the text; redo it as keys.
                host.undo();
                let take = if self.state.mode == VimMode::Replace {
                    usize::MAX
                } else {
                    1
                };
                for c in text.chars().take(take) {
                    self.handle_key(KeyInput::char(c), host);
                }
                true
            }
            _ => {
                tracing::debug!(text, "discarding composed text outside insert mode");
                host.undo();
                true
            }
        }
    }

    /// Record a key typed in INSERT mode for dot-repeat.
    fn capture_typed(&mut self, key: &KeyInput) {
        if self.state.mode != VimMode::Insert {
            return;
        }
        let Some(edit) = self.state.last_edit.as_mut().filter(|e| e.recording) else {
            return;
        };
        match (key.printable(), key.code) {
            (Some(c), _) => edit.inserted.push(c),
            (None, KeyCode::Enter) => edit.inserted.push('\n'),
            (None, KeyCode::Tab) => edit.inserted.push('\t'),
            (None, KeyCode::Backspace) => {
                edit.inserted.pop();
            }
            _ => {}
        }
    }

    // =========================================================================
    // Command execution
    // =========================================================================

    fn execute<H: TextHost + ?Sized>(&mut self, command: VimCommand, host: &mut H) {
        tracing::trace!(?command, "execute");
        let was_visual = self.state.mode.is_visual();
        let register = self.state.selected_register.take();

        if let Err(err) = self.run(command, register, host) {
            self.report(err, host);
        }

        if !self.state.mode.allows_past_end() {
            let cursor = host.cursor();
            let clamped = host.clamp(cursor, false);
            if clamped != cursor {
                host.set_cursor(clamped);
            }
        }
        if self.state.mode.is_visual() {
            self.update_selection(host);
        } else if was_visual {
            let cursor = host.cursor();
            host.set_selection(Range::empty(cursor));
        }
    }

    fn run<H: TextHost + ?Sized>(
        &mut self,
        command: VimCommand,
        register: Option<char>,
        host: &mut H,
    ) -> Result<()> {
        match command {
            VimCommand::Move(motion) => return self.move_cursor(motion, host),
            VimCommand::OperatorMotion { operator, motion } => {
                return self.operator_motion(operator, motion, register, host)
            }
            VimCommand::OperatorTextObject {
                operator,
                object,
                modifier,
            } => self.operator_text_object(operator, object, modifier, register, host),
            VimCommand::OperatorLines { operator, count } => {
                self.operator_lines(operator, count, register, host)
            }

            VimCommand::Insert { kind, count } => self.begin_insert(kind, count, host),
            VimCommand::EnterVisual { linewise } => self.enter_visual(linewise, host),
            VimCommand::EnterReplace => self.enter_replace(),
            VimCommand::EnterCommandLine(prefix) => {
                if self.state.mode.is_visual() {
                    self.exit_visual();
                }
                self.state.command_line = prefix.to_string();
                self.set_mode(VimMode::Command);
            }
            VimCommand::ExitToNormal => {
                if self.state.mode.is_visual() {
                    self.exit_visual();
                }
            }

            VimCommand::VisualSwapEnds => {
                let head = self.visual_head(&*host);
                self.state.visual_head = None;
                if let Some(anchor) = self.state.visual_anchor.replace(head) {
                    host.set_cursor(anchor);
                }
            }
            VimCommand::VisualOperator(operator) => self.visual_operator(operator, register, host),
            VimCommand::VisualTextObject { object, modifier } => {
                self.visual_text_object(object, modifier, host)
            }

            VimCommand::Paste { before, count } => return self.paste(before, count, register, host),
            VimCommand::ReplaceChar { ch, count } => self.replace_char(ch, count, host),
            VimCommand::ToggleCase { count } => self.toggle_case(count, host),
            VimCommand::JoinLines { count } => self.join_lines(count, host),
            VimCommand::RepeatLastEdit { count } => return self.repeat_last_edit(count, host),
            VimCommand::Undo { count } => (0..count.max(1)).for_each(|_| host.undo()),
            VimCommand::Redo { count } => (0..count.max(1)).for_each(|_| host.redo()),

            VimCommand::SearchWord { forward, count } => {
                return self.search_word(forward, count, host)
            }
            VimCommand::SetMark(name) => {
                let cursor = host.cursor();
                self.state.marks.set(name, cursor);
            }

            VimCommand::StartRecording(name) => {
                self.state.macros.start_recording(name);
            }
            VimCommand::StopRecording => {
                self.state.macros.stop_recording();
            }
            VimCommand::PlayMacro { name, count } => return self.play_macro(name, count, host),

            VimCommand::JumpBack { count } => {
                let cursor = host.cursor();
                let mut target = None;
                for _ in 0..count.max(1) {
                    match self.state.jump_list.back(cursor) {
                        Some(pos) => target = Some(pos),
                        None => break,
                    }
                }
                if let Some(pos) = target {
                    jump_to(host, pos);
                }
            }
            VimCommand::JumpForward { count } => {
                let mut target = None;
                for _ in 0..count.max(1) {
                    match self.state.jump_list.forward() {
                        Some(pos) => target = Some(pos),
                        None => break,
                    }
                }
                if let Some(pos) = target {
                    jump_to(host, pos);
                }
            }

            VimCommand::ExitInsert => self.exit_insert(host),
            VimCommand::Overwrite(c) => self.overwrite(c, host),
            VimCommand::CommandLineInput(c) => self.state.command_line.push(c),
            VimCommand::CommandLineBackspace => {
                if self.state.command_line.chars().count() <= 1 {
                    self.state.command_line.clear();
                    self.set_mode(VimMode::Normal);
                } else {
                    self.state.command_line.pop();
                }
            }
            VimCommand::CommandLineCancel => {
                self.state.command_line.clear();
                self.set_mode(VimMode::Normal);
            }
            VimCommand::CommandLineExecute => {
                let line = std::mem::take(&mut self.state.command_line);
                self.set_mode(VimMode::Normal);
                return self.execute_command_line(&line, host);
            }

            VimCommand::Fail(err) => return Err(err),
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: VimMode) {
        if self.state.mode != mode {
            tracing::debug!(from = %self.state.mode, to = %mode, "mode change");
            self.state.mode = mode;
        }
    }

    // =========================================================================
    // Motions
    // =========================================================================

    fn move_cursor<H: TextHost + ?Sized>(&mut self, motion: Motion, host: &mut H) -> Result<()> {
        let from = host.cursor();
        self.move_cursor_from(motion, from, host)
    }

    /// Move to where `motion` lands when resolved from `from`.
    fn move_cursor_from<H: TextHost + ?Sized>(
        &mut self,
        motion: Motion,
        from: Position,
        host: &mut H,
    ) -> Result<()> {
        let Some(target) = self.resolve_motion(&motion, from, host)? else {
            return Ok(());
        };
        if motion.is_jump() {
            let cursor = host.cursor();
            self.record_jump(cursor);
        }
        if self.state.mode.is_visual() {
            self.state.visual_inclusive = motion.is_inclusive();
            self.state.visual_head = Some(target);
        }
        jump_to(host, target);
        Ok(())
    }

    /// Resolve any motion, including the ones that need engine state.
    fn resolve_motion<H: TextHost + ?Sized>(
        &mut self,
        motion: &Motion,
        from: Position,
        host: &mut H,
    ) -> Result<Option<Position>> {
        match motion {
            Motion::ScreenTop(_) | Motion::ScreenMiddle | Motion::ScreenBottom(_) => {
                let line = screen_line(motion, host.visible_lines())
                    .map(|line| line.clamp(1, host.line_count().max(1)));
                Ok(line.map(|line| Position::new(line, host.first_non_blank(line))))
            }
            Motion::Search {
                pattern,
                forward,
                count,
            } => {
                let regex = build_regex(pattern, self.config.ignore_case)?;
                let mut pos = from;
                let mut wrapped = false;
                for _ in 0..(*count).max(1) {
                    let found = search::find(&*host, pos, &regex, *forward, self.config.search_wraps)
                        .ok_or(VimError::NotFound)?;
                    wrapped |= found.wrapped;
                    pos = found.start;
                }
                if wrapped {
                    self.info("search wrapped", host);
                }
                Ok(Some(pos))
            }
            Motion::Mark { name, linewise } => {
                let pos = self
                    .state
                    .marks
                    .get(*name)
                    .ok_or(VimError::MarkNotSet(*name))?;
                let pos = host.clamp(pos, false);
                if *linewise {
                    Ok(Some(Position::new(pos.line, host.first_non_blank(pos.line))))
                } else {
                    Ok(Some(pos))
                }
            }
            other => Ok(other.resolve(&*host, from)),
        }
    }

    fn record_jump(&mut self, from: Position) {
        self.state.jump_list.push(from);
        self.state.marks.set_previous(from);
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn operator_motion<H: TextHost + ?Sized>(
        &mut self,
        operator: Operator,
        motion: Motion,
        register: Option<char>,
        host: &mut H,
    ) -> Result<()> {
        let from = host.cursor();
        let special = if operator == Operator::Change {
            change_word_target(&*host, &motion, from)
        } else {
            None
        };
        let resolved = match special {
            Some(target) => Some((target, true, false)),
            None => self
                .resolve_motion(&motion, from, host)?
                .map(|target| (target, motion.is_inclusive(), motion.is_linewise())),
        };
        let Some((target, inclusive, linewise)) = resolved else {
            return Ok(());
        };

        if motion.is_jump() {
            self.record_jump(from);
        }
        let span = if linewise {
            OperatorSpan::lines(from.line, target.line)
        } else {
            OperatorSpan::Chars(charwise_range(&*host, from, target, inclusive))
        };
        self.apply_operator(operator, span, register, host);
        let count = motion.count().unwrap_or(1);
        self.remember_edit(operator, EditTarget::Motion(motion), count);
        Ok(())
    }

    fn operator_text_object<H: TextHost + ?Sized>(
        &mut self,
        operator: Operator,
        object: TextObject,
        modifier: TextObjectModifier,
        register: Option<char>,
        host: &mut H,
    ) {
        let cursor = host.cursor();
        let Some(range) = object.resolve(&*host, cursor, modifier) else {
            tracing::debug!(object = object.description(), "no text object at cursor");
            return;
        };
        self.apply_operator(operator, OperatorSpan::Chars(range), register, host);
        self.remember_edit(operator, EditTarget::TextObject(object, modifier), 1);
    }

    fn operator_lines<H: TextHost + ?Sized>(
        &mut self,
        operator: Operator,
        count: usize,
        register: Option<char>,
        host: &mut H,
    ) {
        let first = host.cursor().line;
        let last = (first + count.max(1) - 1).min(host.line_count());
        self.apply_operator(operator, OperatorSpan::Lines { first, last }, register, host);
        self.remember_edit(operator, EditTarget::Lines(count), count);
    }

    fn apply_operator<H: TextHost + ?Sized>(
        &mut self,
        operator: Operator,
        span: OperatorSpan,
        register: Option<char>,
        host: &mut H,
    ) {
        let outcome = OperatorExecutor::new(&mut self.state.registers, &self.config)
            .apply(host, operator, span, register);
        if let Some(cursor) = outcome.cursor {
            host.set_cursor(cursor);
        }
        if let Some(message) = outcome.message {
            self.info(message, host);
        }
        if outcome.enter_insert {
            self.set_mode(VimMode::Insert);
        }
    }

    /// Record a mutating operator for `.`. `c` keeps capturing typed text.
    fn remember_edit(&mut self, operator: Operator, target: EditTarget, count: usize) {
        if !operator.is_mutating() {
            return;
        }
        let action = EditAction::Operator { operator, target };
        self.state.last_edit = Some(if operator == Operator::Change {
            LastEdit::capturing(action, count)
        } else {
            LastEdit::new(action, count)
        });
    }

    // =========================================================================
    // Insert and replace
    // =========================================================================

    fn begin_insert<H: TextHost + ?Sized>(&mut self, kind: InsertKind, count: usize, host: &mut H) {
        let cursor = host.clamp(host.cursor(), false);
        let len = host.line_len(cursor.line);
        match kind {
            InsertKind::Before => host.set_cursor(cursor),
            InsertKind::After => {
                let column = if len == 0 { 1 } else { cursor.column + 1 };
                host.set_cursor(cursor.with_column(column));
            }
            InsertKind::LineStart => {
                let column = host.first_non_blank(cursor.line);
                host.set_cursor(cursor.with_column(column));
            }
            InsertKind::LineEnd => host.set_cursor(cursor.with_column(len + 1)),
            InsertKind::OpenBelow => {
                host.edit(Range::empty(cursor.with_column(len + 1)), "\n");
                host.set_cursor(Position::new(cursor.line + 1, 1));
            }
            InsertKind::OpenAbove => {
                host.edit(Range::empty(cursor.with_column(1)), "\n");
                host.set_cursor(Position::new(cursor.line, 1));
            }
        }
        self.set_mode(VimMode::Insert);
        self.state.last_edit = Some(LastEdit::capturing(EditAction::Insert(kind), count));
    }

    /// Leave INSERT or REPLACE: repeat counted inserts, step the cursor left.
    fn exit_insert<H: TextHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(edit) = self.state.last_edit.as_mut().filter(|e| e.recording) {
            edit.recording = false;
            if let EditAction::Insert(kind) = edit.action {
                if edit.count > 1 && !edit.inserted.is_empty() {
                    let unit = if kind.opens_line() {
                        format!("\n{}", edit.inserted)
                    } else {
                        edit.inserted.clone()
                    };
                    host.insert_at_cursor(&unit.repeat(edit.count - 1));
                }
            }
        }
        let cursor = host.cursor();
        host.set_cursor(cursor.with_column(cursor.column.saturating_sub(1).max(1)));
        self.set_mode(VimMode::Normal);
    }

    fn enter_replace(&mut self) {
        self.set_mode(VimMode::Replace);
        self.state.last_edit = Some(LastEdit::capturing(EditAction::Overwrite, 1));
    }

    /// Overwrite the character under the cursor (append past the end).
    fn overwrite<H: TextHost + ?Sized>(&mut self, c: char, host: &mut H) {
        let cursor = host.clamp(host.cursor(), true);
        let range = if cursor.column <= host.line_len(cursor.line) {
            Range::new(cursor, cursor.with_column(cursor.column + 1))
        } else {
            Range::empty(cursor)
        };
        host.edit(range, &c.to_string());
        host.set_cursor(cursor.with_column(cursor.column + 1));
        if let Some(edit) = self.state.last_edit.as_mut().filter(|e| e.recording) {
            edit.inserted.push(c);
        }
    }

    /// Type `text` into the insert started by a replayed change, then leave.
    fn finish_replayed_insert<H: TextHost + ?Sized>(&mut self, text: &str, host: &mut H) {
        host.insert_at_cursor(text);
        if let Some(edit) = self.state.last_edit.as_mut() {
            edit.inserted = text.to_string();
        }
        self.exit_insert(host);
    }

    // =========================================================================
    // Visual mode
    // =========================================================================

    fn enter_visual<H: TextHost + ?Sized>(&mut self, linewise: bool, host: &mut H) {
        let target = if linewise {
            VimMode::VisualLine
        } else {
            VimMode::Visual
        };
        if self.state.mode == target {
            self.exit_visual();
        } else if self.state.mode.is_visual() {
            self.set_mode(target);
        } else {
            self.state.visual_anchor = Some(host.clamp(host.cursor(), false));
            self.state.visual_head = None;
            self.state.visual_inclusive = false;
            self.set_mode(target);
        }
    }

    fn exit_visual(&mut self) {
        self.state.visual_anchor = None;
        self.state.visual_head = None;
        self.set_mode(VimMode::Normal);
    }

    /// The moving end of the selection: the last motion's target, which may
    /// sit past a line end, while the cursor still rests on it.
    fn visual_head<H: TextHost + ?Sized>(&self, host: &H) -> Position {
        let cursor = host.clamp(host.cursor(), false);
        self.state
            .visual_head
            .filter(|head| host.clamp(*head, false) == cursor)
            .unwrap_or(cursor)
    }

    /// The live selection as an operator span.
    fn visual_span<H: TextHost + ?Sized>(&self, host: &H) -> Option<OperatorSpan> {
        let anchor = self.state.visual_anchor?;
        let head = self.visual_head(host);
        match self.state.mode {
            VimMode::VisualLine => Some(OperatorSpan::lines(anchor.line, head.line)),
            VimMode::Visual => {
                let range = charwise_range(host, anchor, head, self.state.visual_inclusive);
                let start = range.start;
                if range.is_empty() && start.column <= host.line_len(start.line) {
                    // An empty selection still covers the character under the cursor.
                    Some(OperatorSpan::Chars(Range::new(
                        start,
                        start.with_column(start.column + 1),
                    )))
                } else {
                    Some(OperatorSpan::Chars(range))
                }
            }
            _ => None,
        }
    }

    fn update_selection<H: TextHost + ?Sized>(&self, host: &mut H) {
        let range = match self.visual_span(&*host) {
            Some(OperatorSpan::Chars(range)) => range,
            Some(OperatorSpan::Lines { first, last }) => Range::new(
                Position::new(first, 1),
                Position::new(last, host.line_len(last) + 1),
            ),
            None => return,
        };
        host.set_selection(range);
    }

    fn visual_operator<H: TextHost + ?Sized>(
        &mut self,
        operator: Operator,
        register: Option<char>,
        host: &mut H,
    ) {
        let Some(span) = self.visual_span(&*host) else {
            self.exit_visual();
            return;
        };
        let (target, count, start) = match span {
            OperatorSpan::Lines { first, last } => (
                EditTarget::Lines(last - first + 1),
                last - first + 1,
                Position::new(first, host.cursor().column),
            ),
            OperatorSpan::Chars(range) => {
                let columns = if range.is_single_line() {
                    range.end.column - range.start.column
                } else {
                    range.end.column
                };
                let target = EditTarget::Chars {
                    line_delta: range.end.line - range.start.line,
                    columns,
                };
                (target, 1, range.start)
            }
        };

        self.exit_visual();
        self.apply_operator(operator, span, register, host);
        if operator == Operator::Yank {
            let start = host.clamp(start, false);
            host.set_cursor(start);
        }
        self.remember_edit(operator, target, count);
    }

    fn visual_text_object<H: TextHost + ?Sized>(
        &mut self,
        object: TextObject,
        modifier: TextObjectModifier,
        host: &mut H,
    ) {
        let cursor = host.cursor();
        let Some(range) = object.resolve(&*host, cursor, modifier) else {
            tracing::debug!(object = object.description(), "no text object at cursor");
            return;
        };
        if range.is_empty() {
            return;
        }
        self.state.visual_anchor = Some(range.start);
        self.state.visual_head = None;
        self.state.visual_inclusive = true;
        self.set_mode(VimMode::Visual);
        let last = range.end.with_column(range.end.column.saturating_sub(1).max(1));
        host.set_cursor(last);
    }

    // =========================================================================
    // Simple edits
    // =========================================================================

    fn paste<H: TextHost + ?Sized>(
        &mut self,
        before: bool,
        count: usize,
        register: Option<char>,
        host: &mut H,
    ) -> Result<()> {
        let name = register.unwrap_or(RegisterStore::UNNAMED);
        let source = self
            .state
            .registers
            .get(name)
            .filter(|r| !r.text.is_empty())
            .cloned()
            .ok_or(VimError::EmptyRegister(name))?;
        let cursor = operator::paste(host, &source, before, count);
        host.set_cursor(cursor);
        self.state.last_edit = Some(LastEdit::new(EditAction::Paste { before, register }, count));
        Ok(())
    }

    fn replace_char<H: TextHost + ?Sized>(&mut self, ch: char, count: usize, host: &mut H) {
        let cursor = host.clamp(host.cursor(), false);
        if let Some(pos) = operator::replace_chars(host, cursor, ch, count) {
            host.set_cursor(pos);
            self.state.last_edit = Some(LastEdit::new(EditAction::ReplaceChars(ch), count));
        }
    }

    fn toggle_case<H: TextHost + ?Sized>(&mut self, count: usize, host: &mut H) {
        let cursor = host.clamp(host.cursor(), false);
        let pos = operator::toggle_case_chars(host, cursor, count);
        host.set_cursor(pos);
        self.state.last_edit = Some(LastEdit::new(EditAction::ToggleCase, count));
    }

    fn join_lines<H: TextHost + ?Sized>(&mut self, count: usize, host: &mut H) {
        let line = host.cursor().line;
        if let Some(pos) = operator::join_lines(host, line, count) {
            host.set_cursor(pos);
            self.state.last_edit = Some(LastEdit::new(EditAction::JoinLines, count));
        }
    }

    /// Replay the effect of the last change at the cursor.
    fn repeat_last_edit<H: TextHost + ?Sized>(
        &mut self,
        count_override: Option<usize>,
        host: &mut H,
    ) -> Result<()> {
        let Some(edit) = self.state.last_edit.clone().filter(|e| !e.recording) else {
            return Ok(());
        };
        let count = count_override.unwrap_or(edit.count);
        tracing::debug!(action = ?edit.action, count, "repeating last edit");

        match edit.action {
            EditAction::Insert(kind) => {
                self.begin_insert(kind, count, host);
                self.finish_replayed_insert(&edit.inserted, host);
            }
            EditAction::Operator { operator, target } => {
                match target {
                    EditTarget::Motion(motion) => {
                        let motion = match count_override {
                            Some(n) => motion.with_count(n),
                            None => motion,
                        };
                        self.operator_motion(operator, motion, None, host)?;
                    }
                    EditTarget::TextObject(object, modifier) => {
                        self.operator_text_object(operator, object, modifier, None, host)
                    }
                    EditTarget::Lines(lines) => {
                        self.operator_lines(operator, count_override.unwrap_or(lines), None, host)
                    }
                    EditTarget::Chars {
                        line_delta,
                        columns,
                    } => {
                        let start = host.clamp(host.cursor(), false);
                        let end = if line_delta == 0 {
                            start.with_column(start.column + columns)
                        } else {
                            Position::new(start.line + line_delta, columns)
                        };
                        let range = Range::new(start, host.clamp(end, true));
                        self.apply_operator(operator, OperatorSpan::Chars(range), None, host);
                        self.remember_edit(
                            operator,
                            EditTarget::Chars {
                                line_delta,
                                columns,
                            },
                            1,
                        );
                    }
                }
                if operator == Operator::Change && self.state.mode == VimMode::Insert {
                    self.finish_replayed_insert(&edit.inserted, host);
                }
            }
            EditAction::Paste { before, register } => {
                self.paste(before, count, register, host)?;
            }
            EditAction::ReplaceChars(ch) => self.replace_char(ch, count, host),
            EditAction::ToggleCase => self.toggle_case(count, host),
            EditAction::JoinLines => self.join_lines(count, host),
            EditAction::Overwrite => {
                self.enter_replace();
                for c in edit.inserted.chars() {
                    self.overwrite(c, host);
                }
                self.exit_insert(host);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Search, macros, command line
    // =========================================================================

    fn set_last_search(&mut self, pattern: String, forward: bool) {
        self.state.registers.set_special('/', pattern.as_str());
        self.state.last_search = Some(LastSearch { pattern, forward });
    }

    fn search_word<H: TextHost + ?Sized>(
        &mut self,
        forward: bool,
        count: usize,
        host: &mut H,
    ) -> Result<()> {
        let cursor = host.clamp(host.cursor(), false);
        let word = word_under_cursor(&*host, cursor).ok_or(VimError::NotFound)?;
        let pattern = whole_word_pattern(&word);
        self.set_last_search(pattern.clone(), forward);
        let from = keyword_start(&*host, cursor);
        self.move_cursor_from(
            Motion::Search {
                pattern,
                forward,
                count,
            },
            from,
            host,
        )
    }

    fn play_macro<H: TextHost + ?Sized>(
        &mut self,
        name: char,
        count: usize,
        host: &mut H,
    ) -> Result<()> {
        let limit = self.config.max_macro_depth;
        if self.replay_depth >= limit {
            tracing::warn!(register = %name, limit, "macro recursion limit reached");
            self.macro_aborted = true;
            return Err(VimError::MacroDepthExceeded(limit));
        }
        let keys = self
            .state
            .macros
            .get(name)
            .map(<[KeyInput]>::to_vec)
            .ok_or(VimError::EmptyMacro(name))?;
        self.state.macros.set_last_played(name);
        tracing::debug!(register = %name, keys = keys.len(), count, "playing macro");

        self.replay_depth += 1;
        for _ in 0..count.max(1) {
            self.feed_keys(&keys, host);
            if self.macro_aborted {
                break;
            }
        }
        self.replay_depth -= 1;
        if self.replay_depth == 0 {
            self.macro_aborted = false;
        }
        Ok(())
    }

    fn execute_command_line<H: TextHost + ?Sized>(&mut self, line: &str, host: &mut H) -> Result<()> {
        tracing::debug!(line, "executing command line");
        let command = ExCommand::parse(line)?;
        if let Some(body) = line.strip_prefix(':').filter(|b| !b.is_empty()) {
            self.state.registers.set_special(':', body);
        }

        match command {
            ExCommand::Search { pattern, forward } => {
                let pattern = if pattern.is_empty() {
                    self.state
                        .last_search
                        .as_ref()
                        .map(|s| s.pattern.clone())
                        .ok_or(VimError::NoPreviousSearch)?
                } else {
                    pattern
                };
                build_regex(&pattern, self.config.ignore_case)?;
                let motion = Motion::Search {
                    pattern: pattern.clone(),
                    forward,
                    count: 1,
                };
                self.move_cursor(motion, host)?;
                self.set_last_search(pattern, forward);
                Ok(())
            }
            ExCommand::GotoLine(line) => self.move_cursor(Motion::DocumentStart(Some(line)), host),
            ExCommand::GotoLast => self.move_cursor(Motion::DocumentEnd(None), host),
            ExCommand::Substitute(substitute) => {
                let report = substitute.apply(host, self.state.last_search.as_ref())?;
                self.info(report.to_string(), host);
                Ok(())
            }
            ExCommand::Named { name, args } => self.commands.invoke(&name, &args),
            ExCommand::Empty => Ok(()),
        }
    }

    // =========================================================================
    // Messages
    // =========================================================================

    fn post<H: TextHost + ?Sized>(&mut self, message: StatusMessage, host: &mut H) {
        host.notify(&message);
        self.message = Some(message);
    }

    fn info<H: TextHost + ?Sized>(&mut self, text: impl Into<String>, host: &mut H) {
        let message = StatusMessage::info(text, self.config.message_duration());
        self.post(message, host);
    }

    fn report<H: TextHost + ?Sized>(&mut self, err: VimError, host: &mut H) {
        tracing::debug!(error = %err, "command failed");
        let duration = self.config.message_duration();
        let message = match err {
            VimError::MacroDepthExceeded(_) => StatusMessage::warning(err.to_string(), duration),
            _ => StatusMessage::error(err.to_string(), duration),
        };
        self.post(message, host);
    }
}

/// Move the cursor to `pos` (clamped onto a character) and scroll to it.
fn jump_to<H: TextHost + ?Sized>(host: &mut H, pos: Position) {
    let pos = host.clamp(pos, false);
    host.set_cursor(pos);
    host.reveal_position(pos);
}

/// The characterwise range an operator covers between two endpoints.
///
/// An inclusive motion covers its target character. An exclusive motion that
/// ends at column 1 of a later line stops at the end of the line before.
fn charwise_range<B: TextBuffer + ?Sized>(
    buffer: &B,
    a: Position,
    b: Position,
    inclusive: bool,
) -> Range {
    let (start, mut end) = if a <= b { (a, b) } else { (b, a) };
    if inclusive {
        if end.column <= buffer.line_len(end.line) {
            end = end.with_column(end.column + 1);
        }
    } else if end.column == 1 && end.line > start.line {
        let line = end.line - 1;
        end = Position::new(line, buffer.line_len(line) + 1);
    }
    Range::new(start, end)
}

/// `cw` on a non-blank changes to the end of the word, like `ce`, and only
/// the character itself when it already ends a word.
fn change_word_target<B: TextBuffer + ?Sized>(
    buffer: &B,
    motion: &Motion,
    from: Position,
) -> Option<Position> {
    let Motion::WordForward(n) = *motion else {
        return None;
    };
    if buffer.char_at(from).map_or(true, char::is_whitespace) {
        return None;
    }
    let at_word_end = buffer
        .char_at(from.with_column(from.column + 1))
        .map_or(true, char::is_whitespace);
    let steps = if at_word_end { n.saturating_sub(1) } else { n };
    if steps == 0 {
        Some(from)
    } else {
        Motion::WordEnd(steps).resolve(buffer, from)
    }
}

/// Start of the keyword under `pos`, or `pos` itself.
fn keyword_start<B: TextBuffer + ?Sized>(buffer: &B, pos: Position) -> Position {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    let is_keyword = |c: char| c.is_alphanumeric() || c == '_';
    let mut column = pos.column;
    if !chars.get(column - 1).copied().is_some_and(is_keyword) {
        return pos;
    }
    while column > 1 && is_keyword(chars[column - 2]) {
        column -= 1;
    }
    pos.with_column(column)
}
