//! 編集エンジン
//!
//! キルリング・レジスタ・モードを保持し、ホストバッファに対するキル／ヤンク／
//! 矩形／レジスタ操作を実装する。バッファとの手順は常に
//! 「削除前にテキストを読む → 削除の適用を確認 → キルリングへ記録」の順。
//!
//! コマンドハンドラはエラーを呼び出し元へ返さず、ステータスへ表示して
//! 成否だけを返す。

use super::chord::{ChordAction, ChordDispatcher, KeyDisposition, RectangleVerb};
use super::kill_ring::KillRing;
use super::modes::{Mode, ModeSet};
use super::register::RegisterStore;
use crate::buffer::{Motion, Position, Range, Selection, SurfaceCommand, TextSurface};
use crate::config::EngineConfig;
use crate::error::{edit, EditError, MessageDisplay, DEFAULT_MESSAGE_DURATION};
use crate::ui::StatusSink;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

const CUA_MESSAGE_DURATION: Duration = Duration::from_millis(2000);
const RECTANGLE_MESSAGE_DURATION: Duration = Duration::from_millis(5000);

/// 大文字小文字変換の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Upper,
    Lower,
    /// 先頭文字のみ大文字化（残りはそのまま）
    Capitalize,
}

impl Casing {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Casing::Upper => text.to_uppercase(),
            Casing::Lower => text.to_lowercase(),
            Casing::Capitalize => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// 大文字小文字変換の対象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseScope {
    /// カーソル位置の単語（選択なしのとき）
    Word,
    /// 選択範囲
    Region,
}

/// 入力文字の処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeOutcome {
    /// 通常入力としてバッファへ渡した
    PassedThrough,
    /// チョードが消費した
    Consumed,
}

/// キル・ヤンク・レジスタ編集エンジン
#[derive(Debug)]
pub struct EditingEngine<N: StatusSink> {
    kill_ring: KillRing,
    registers: RegisterStore,
    modes: ModeSet,
    /// 直前のキルの削除開始位置（カーソル移動で破棄）
    last_kill_anchor: Option<Position>,
    /// 直前のヤンクで挿入した範囲
    last_insertion: Option<Range>,
    /// 直前の矩形キル／コピー（行ごと）
    last_rectangular_kill: Option<Vec<String>>,
    status: N,
    default_message_duration: Duration,
}

impl<N: StatusSink> EditingEngine<N> {
    /// 既定設定でエンジンを作成
    pub fn new(status: N) -> Self {
        Self::with_config(&EngineConfig::default(), status)
    }

    /// 設定からエンジンを作成
    pub fn with_config(config: &EngineConfig, status: N) -> Self {
        Self {
            kill_ring: KillRing::with_capacity(config.kill_ring_capacity),
            registers: RegisterStore::new(),
            modes: ModeSet::new(),
            last_kill_anchor: None,
            last_insertion: None,
            last_rectangular_kill: None,
            status,
            default_message_duration: config.default_message_duration(),
        }
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    pub fn registers(&self) -> &RegisterStore {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterStore {
        &mut self.registers
    }

    pub fn modes(&self) -> &ModeSet {
        &self.modes
    }

    pub fn status(&self) -> &N {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut N {
        &mut self.status
    }

    /// 直前の矩形（行ごと）
    pub fn last_rectangle(&self) -> Option<&[String]> {
        self.last_rectangular_kill.as_deref()
    }

    /// 直前のキル位置
    pub fn last_kill_anchor(&self) -> Option<Position> {
        self.last_kill_anchor
    }

    /// 既定の表示時間で一時メッセージを表示
    pub fn show_message(&mut self, text: &str) {
        self.notify(text, self.default_message_duration);
    }

    /// キルリング・レジスタ・モードはそのまま、フォーカスが別バッファへ移ったことを通知
    pub fn focus_changed(&mut self) {
        self.break_sequences();
    }

    // ---------------------------------------------------------------
    // キル／コピー／カット
    // ---------------------------------------------------------------

    /// 選択範囲、無ければカーソルから行末までをキルする
    ///
    /// カーソルが直前のキル位置から動いていなければ現在のエントリへ追記する。
    pub fn kill<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.last_insertion = None;
        self.modes.deactivate(Mode::Mark);
        match self.try_kill(surface) {
            Ok(killed) => killed,
            Err(err) => {
                self.last_kill_anchor = None;
                self.report(&err);
                false
            }
        }
    }

    fn try_kill<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> edit::Result<bool> {
        let selection = surface.selection();
        let range = if selection.is_empty() {
            line_kill_range(surface, selection.active)?
        } else {
            selection.range()
        };

        if range.is_empty() {
            // バッファ末尾では何も消さない
            self.last_kill_anchor = None;
            return Ok(false);
        }

        let text = surface.text(range);
        surface.delete(range)?;
        surface.set_selection(Selection::caret(range.start));

        // 直前のキル位置にカーソルが留まっている場合だけ追記
        let continues =
            self.last_kill_anchor == Some(range.start) && selection.active == range.start;
        if continues {
            log::debug!("kill: appending {} chars to current entry", text.chars().count());
            self.kill_ring.append(&text);
        } else {
            log::debug!("kill: new entry of {} chars", text.chars().count());
            self.kill_ring.save(text);
        }
        self.last_kill_anchor = Some(range.start);
        Ok(true)
    }

    /// 選択範囲をキルリングへ保存し、選択とマークを解除する
    pub fn copy<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.break_sequences();
        let result = self.try_copy(surface);
        self.finish(result)
    }

    fn try_copy<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> edit::Result<()> {
        let selection = surface.selection();
        if selection.is_empty() {
            self.exit_mark_mode(surface)?;
            return Err(EditError::EmptyRegion);
        }
        self.kill_ring.save(surface.text(selection.range()));
        self.exit_mark_mode(surface)
    }

    /// 選択範囲をキルリングへ保存して削除する
    ///
    /// 選択が無い場合と削除が失敗した場合は、バッファもキルリングも変更しない。
    pub fn cut<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.break_sequences();
        let result = self.try_cut(surface);
        self.finish(result)
    }

    fn try_cut<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> edit::Result<()> {
        let selection = surface.selection();
        if selection.is_empty() {
            return Err(EditError::EmptyRegion);
        }
        let range = selection.range();
        let text = surface.text(range);
        surface.delete(range)?;
        surface.set_selection(Selection::caret(range.start));
        self.kill_ring.save(text);
        self.modes.deactivate(Mode::Mark);
        Ok(())
    }

    // ---------------------------------------------------------------
    // ヤンク
    // ---------------------------------------------------------------

    /// 最新のキルをカーソル位置へ挿入する
    pub fn yank<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.last_kill_anchor = None;
        self.last_insertion = None;
        let result = self.try_yank(surface);
        self.finish(result)
    }

    fn try_yank<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> edit::Result<()> {
        self.kill_ring.reset_traversal();
        let text = self.kill_ring.top().ok_or(EditError::EmptyKillRing)?;
        let at = surface.selection().active;
        surface.insert(at, &text)?;
        let end = at.advanced_by(&text);
        surface.set_selection(Selection::caret(end));
        self.last_insertion = Some(Range::new(at, end));
        Ok(())
    }

    /// 直前のヤンクを一つ古いエントリで置き換える
    pub fn yank_pop<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.last_kill_anchor = None;
        let result = self.try_yank_pop(surface);
        if result.is_err() {
            self.last_insertion = None;
        }
        self.finish(result)
    }

    fn try_yank_pop<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> edit::Result<()> {
        if self.kill_ring.is_empty() {
            return Err(EditError::EmptyKillRing);
        }
        let cursor = surface.selection().active;
        let previous = self
            .last_insertion
            .filter(|range| range.end == cursor)
            .ok_or(EditError::StaleYank)?;

        self.kill_ring.backward();
        let text = self.kill_ring.top().unwrap_or_default();
        if let Err(err) = surface.replace(previous, &text) {
            self.kill_ring.forward();
            return Err(err.into());
        }

        let end = previous.start.advanced_by(&text);
        surface.set_selection(Selection::caret(end));
        self.last_insertion = Some(Range::new(previous.start, end));
        Ok(())
    }

    // ---------------------------------------------------------------
    // モード
    // ---------------------------------------------------------------

    /// マークモードを切り替える（矩形マークモードは解除）
    pub fn toggle_mark_mode<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let result = if self.modes.is_active(Mode::Mark) {
            self.exit_mark_mode(surface)
        } else {
            self.enter_mode(surface, Mode::Mark);
            Ok(())
        };
        self.finish(result);
        self.modes.is_active(Mode::Mark)
    }

    /// マークモードに入る（既に有効なら何もしない）
    pub fn enter_mark_mode<S: TextSurface + ?Sized>(&mut self, surface: &mut S) {
        if !self.modes.is_active(Mode::Mark) {
            self.enter_mode(surface, Mode::Mark);
        }
    }

    /// マークモードを抜けて選択を解除する
    pub fn exit_mark_mode<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> edit::Result<()> {
        self.modes.deactivate(Mode::Mark);
        surface.execute(SurfaceCommand::CancelSelection)?;
        Ok(())
    }

    /// 矩形マークモードを切り替える（マークモードは解除）
    pub fn toggle_rectangle_mark_mode<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.modes.is_active(Mode::RectangleMark) {
            self.modes.deactivate(Mode::RectangleMark);
            let result = surface
                .execute(SurfaceCommand::CancelSelection)
                .map_err(EditError::from);
            self.finish(result);
        } else {
            self.enter_mode(surface, Mode::RectangleMark);
        }
        self.modes.is_active(Mode::RectangleMark)
    }

    /// CUA モードを切り替える
    pub fn toggle_cua_mode(&mut self) -> bool {
        self.modes.toggle(Mode::Cua)
    }

    fn enter_mode<S: TextSurface + ?Sized>(&mut self, surface: &mut S, mode: Mode) {
        let current = surface.selection().active;
        surface.set_selection(Selection::caret(current));
        match mode {
            Mode::Mark => self.modes.deactivate(Mode::RectangleMark),
            Mode::RectangleMark => self.modes.deactivate(Mode::Mark),
            Mode::Cua => {}
        }
        self.modes.activate(mode);
    }

    /// モードに応じたカーソル移動（マーク中は選択を伸ばす）
    pub fn move_cursor<S: TextSurface + ?Sized>(&mut self, surface: &mut S, motion: Motion) -> bool {
        self.break_sequences();
        let command = if self.modes.is_active(Mode::Mark) {
            SurfaceCommand::Move { motion, select: true }
        } else if self.modes.is_active(Mode::RectangleMark) {
            SurfaceCommand::ColumnSelect(motion)
        } else {
            SurfaceCommand::Move { motion, select: false }
        };
        let result = surface.execute(command).map_err(EditError::from);
        self.finish(result)
    }

    // ---------------------------------------------------------------
    // CUA
    // ---------------------------------------------------------------

    pub fn cua_cut<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.modes.is_active(Mode::Cua) {
            return false;
        }
        if surface.selection().is_empty() {
            self.notify("Not in region", CUA_MESSAGE_DURATION);
            return false;
        }
        let done = self.cut(surface);
        if done {
            self.notify("Region cut", CUA_MESSAGE_DURATION);
        }
        done
    }

    pub fn cua_copy<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.modes.is_active(Mode::Cua) {
            return false;
        }
        if surface.selection().is_empty() {
            self.notify("Not in region", CUA_MESSAGE_DURATION);
            return false;
        }
        let done = self.copy(surface);
        if done {
            self.notify("Region copied", CUA_MESSAGE_DURATION);
        }
        done
    }

    /// CUA 無効時はページ送り
    pub fn cua_paste<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.modes.is_active(Mode::Cua) {
            return self.move_cursor(surface, Motion::PageDown);
        }
        if surface.selection().is_empty() {
            self.notify("Not in region", CUA_MESSAGE_DURATION);
            return false;
        }
        let done = self.yank(surface);
        if done {
            self.notify("Region pasted", CUA_MESSAGE_DURATION);
        }
        done
    }

    // ---------------------------------------------------------------
    // 大文字小文字・空行・取り消し・中断
    // ---------------------------------------------------------------

    pub fn change_case<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        casing: Casing,
        scope: CaseScope,
    ) -> bool {
        self.break_sequences();
        let result = self.try_change_case(surface, casing, scope);
        self.finish(result)
    }

    fn try_change_case<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        casing: Casing,
        scope: CaseScope,
    ) -> edit::Result<()> {
        let selection = surface.selection();
        let target = match scope {
            CaseScope::Word if selection.is_empty() => word_range_at(surface, selection.active),
            CaseScope::Region if !selection.is_empty() => Some(selection.range()),
            _ => None,
        };
        let range = target.ok_or(EditError::NoRegionSelected)?;
        let converted = casing.apply(&surface.text(range));
        surface.replace(range, &converted)?;
        Ok(())
    }

    /// 空行を削除する（`C-x C-o`）
    ///
    /// 空行上では連続する空行を1行にまとめ（孤立した空行は削除）、
    /// 非空行上では直後に続く空行を削除する。
    pub fn delete_blank_lines<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.break_sequences();
        let result = self.try_delete_blank_lines(surface);
        self.finish(result)
    }

    fn try_delete_blank_lines<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> edit::Result<()> {
        let cursor = surface.selection().active;
        let count = surface.line_count();
        let mut last = cursor.line;
        while last + 1 < count && is_blank_line(surface, last + 1) {
            last += 1;
        }

        if !is_blank_line(surface, cursor.line) {
            if last == cursor.line {
                return Ok(());
            }
            let range = if last + 1 < count {
                Range::new(Position::new(cursor.line + 1, 0), Position::new(last + 1, 0))
            } else {
                Range::new(
                    Position::new(cursor.line, surface.line_len(cursor.line)),
                    Position::new(last, surface.line_len(last)),
                )
            };
            surface.delete(range)?;
            surface.set_selection(Selection::caret(cursor));
            return Ok(());
        }

        let mut first = cursor.line;
        while first > 0 && is_blank_line(surface, first - 1) {
            first -= 1;
        }

        let (range, caret) = if first < last {
            let start = Position::new(first, 0);
            (Range::new(start, Position::new(last, 0)), start)
        } else if last + 1 < count {
            let start = Position::new(first, 0);
            (Range::new(start, Position::new(first + 1, 0)), start)
        } else if first > 0 {
            let start = Position::new(first - 1, surface.line_len(first - 1));
            (
                Range::new(start, Position::new(first, surface.line_len(first))),
                start,
            )
        } else {
            return Ok(());
        };
        surface.delete(range)?;
        surface.set_selection(Selection::caret(caret));
        Ok(())
    }

    /// ホストの取り消し
    pub fn undo<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.break_sequences();
        let result = surface.execute(SurfaceCommand::Undo).map_err(EditError::from);
        let done = self.finish(result);
        if done {
            self.notify("Undo!", self.default_message_duration);
        }
        done
    }

    /// `C-g`：一時モードとチョードを解除する（CUA は維持）
    pub fn abort(&mut self) {
        self.break_sequences();
        self.modes.deactivate_temp_modes();
        self.status.show_persistent("");
        self.notify("Quit", self.default_message_duration);
    }

    // ---------------------------------------------------------------
    // レジスタ／チョード
    // ---------------------------------------------------------------

    /// `C-x r`：レジスタ系チョードを開始する
    pub fn enter_register_chord(&mut self) {
        self.break_sequences();
        ChordDispatcher::enter(&mut self.modes);
    }

    /// 入力された文字を処理する
    ///
    /// チョードが解決した文字は消費し、それ以外（動詞待ちでの未知の文字を含む）は
    /// 通常入力としてバッファへ渡す。
    pub fn on_typed_character<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        text: &str,
    ) -> KeystrokeOutcome {
        match ChordDispatcher::dispatch(&mut self.modes, text) {
            KeyDisposition::PassThrough => {
                self.break_sequences();
                self.modes.deactivate_temp_modes();
                let result = surface
                    .execute(SurfaceCommand::Type(text.to_string()))
                    .map_err(EditError::from);
                self.finish(result);
                KeystrokeOutcome::PassedThrough
            }
            KeyDisposition::Consumed(action) => {
                self.perform_chord_action(surface, action);
                KeystrokeOutcome::Consumed
            }
        }
    }

    fn perform_chord_action<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        action: ChordAction,
    ) {
        match action {
            ChordAction::Rectangle(verb) => {
                match verb {
                    RectangleVerb::Copy => self.copy_rectangle(surface),
                    RectangleVerb::Kill => self.kill_rectangle(surface),
                    RectangleVerb::Yank => self.yank_rectangle(surface),
                };
                self.modes.deactivate(Mode::RectangleMark);
            }
            ChordAction::Unsupported(verb) => self.report(&EditError::UnsupportedChordVerb(verb)),
            ChordAction::PromptSaveName => self.status.show_persistent("Copy to register:"),
            ChordAction::PromptInsertName => self.status.show_persistent("Insert register:"),
            ChordAction::SaveToRegister(name) => {
                self.status.show_persistent("");
                self.save_to_register(surface, name);
                self.modes.deactivate_temp_modes();
            }
            ChordAction::InsertFromRegister(name) => {
                self.status.show_persistent("");
                self.insert_from_register(surface, name);
                self.modes.deactivate_temp_modes();
            }
        }
    }

    /// 選択範囲のテキストをレジスタへ保存する（選択が無ければ何もしない）
    pub fn save_to_register<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        name: Option<char>,
    ) -> bool {
        let Some(name) = name else {
            return false;
        };
        let selection = surface.selection();
        if selection.is_empty() {
            log::debug!("register {:?}: no region to save", name);
            return false;
        }
        self.registers.save_text(name, surface.text(selection.range()));
        true
    }

    /// レジスタのテキストをカーソル位置へ挿入する
    pub fn insert_from_register<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        name: Option<char>,
    ) -> bool {
        self.break_sequences();
        self.modes.deactivate(Mode::Mark);
        let result = self.try_insert_from_register(surface, name);
        self.finish(result)
    }

    fn try_insert_from_register<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        name: Option<char>,
    ) -> edit::Result<()> {
        let text = name
            .and_then(|name| self.registers.get_text(name))
            .map(str::to_string)
            .ok_or(EditError::EmptyRegister { name })?;
        let at = surface.selection().active;
        surface.insert(at, &text)?;
        surface.set_selection(Selection::caret(at.advanced_by(&text)));
        Ok(())
    }

    // ---------------------------------------------------------------
    // 矩形
    // ---------------------------------------------------------------

    /// 各選択のテキストを行として保存する
    pub fn copy_rectangle<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.break_sequences();
        let lines = selection_texts(surface);
        self.last_rectangular_kill = Some(lines);
        true
    }

    /// 各選択を保存して削除する
    ///
    /// 一部の削除が失敗しても、適用済みの削除は戻さない。
    pub fn kill_rectangle<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.break_sequences();
        let selections = surface.selections();
        let lines = selection_texts(surface);

        let mut failed = 0;
        for index in reverse_document_order(&selections) {
            let range = selections[index].range();
            if range.is_empty() {
                continue;
            }
            if let Err(err) = surface.delete(range) {
                log::warn!("rectangle kill: delete of selection {} failed: {}", index, err);
                failed += 1;
            }
        }
        self.last_rectangular_kill = Some(lines);

        if failed == 0 {
            self.notify("Rectangle Saved!", RECTANGLE_MESSAGE_DURATION);
            true
        } else {
            self.report(&EditError::PartialRectangleFailure {
                failed,
                total: selections.len(),
            });
            false
        }
    }

    /// 保存した矩形を選択ごとに1行ずつ、単一選択ならブロックとして挿入する
    pub fn yank_rectangle<S: TextSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.break_sequences();
        let result = self.try_yank_rectangle(surface);
        self.finish(result)
    }

    fn try_yank_rectangle<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> edit::Result<()> {
        let lines = self
            .last_rectangular_kill
            .as_ref()
            .ok_or(EditError::NoSavedRectangle)?;
        let selections = surface.selections();

        if selections.len() > 1 {
            for index in reverse_document_order(&selections) {
                let line = lines.get(index).map(String::as_str).unwrap_or("");
                surface.replace(selections[index].range(), line)?;
            }
        } else {
            let block: String = lines.iter().map(|line| format!("{}\n", line)).collect();
            let range = surface.selection().range();
            surface.replace(range, &block)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // 内部
    // ---------------------------------------------------------------

    /// 連続キルとヤンクポップの継続を打ち切る
    fn break_sequences(&mut self) {
        self.last_kill_anchor = None;
        self.last_insertion = None;
    }

    fn finish(&mut self, result: edit::Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    fn report(&mut self, error: &EditError) {
        let mut display = MessageDisplay::new(error);
        if display.duration == DEFAULT_MESSAGE_DURATION {
            display = display.with_duration(self.default_message_duration);
        }
        log::debug!("report {:?}: {}", display.level, display.message);
        self.status.show_transient(&display.message, display.duration);
    }

    fn notify(&mut self, text: &str, duration: Duration) {
        self.status.show_transient(text, duration);
    }
}

/// カーソルから行末まで（行末なら改行）の範囲
fn line_kill_range<S: TextSurface + ?Sized>(
    surface: &mut S,
    cursor: Position,
) -> edit::Result<Range> {
    surface.set_selection(Selection::caret(cursor));
    surface.execute(SurfaceCommand::Move {
        motion: Motion::LineEnd,
        select: true,
    })?;
    let end = surface.selection().active;
    surface.set_selection(Selection::caret(cursor));

    if end != cursor {
        Ok(Range::new(cursor, end))
    } else if cursor.line + 1 < surface.line_count() {
        Ok(Range::new(cursor, Position::new(cursor.line + 1, 0)))
    } else {
        Ok(Range::empty(cursor))
    }
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// カーソルが触れている単語の範囲
fn word_range_at<S: TextSurface + ?Sized>(surface: &S, at: Position) -> Option<Range> {
    let line = surface.line_text(at.line);
    word_pattern().find_iter(&line).find_map(|found| {
        let start = line[..found.start()].chars().count();
        let end = start + found.as_str().chars().count();
        (start <= at.column && at.column <= end)
            .then(|| Range::new(Position::new(at.line, start), Position::new(at.line, end)))
    })
}

fn is_blank_line<S: TextSurface + ?Sized>(surface: &S, line: usize) -> bool {
    surface.line_text(line).trim().is_empty()
}

fn selection_texts<S: TextSurface + ?Sized>(surface: &S) -> Vec<String> {
    surface
        .selections()
        .iter()
        .map(|selection| surface.text(selection.range()))
        .collect()
}

/// 後方の選択から処理すると前方の位置がずれない
fn reverse_document_order(selections: &[Selection]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..selections.len()).collect();
    order.sort_by(|a, b| selections[*b].start().cmp(&selections[*a].start()));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemorySurface;
    use crate::ui::MessageLog;

    fn engine() -> EditingEngine<MessageLog> {
        EditingEngine::new(MessageLog::new())
    }

    #[test]
    fn test_kill_to_end_of_line() {
        let mut engine = engine();
        let mut surface = MemorySurface::from_text("hello world\nnext").with_caret(Position::new(0, 5));

        assert!(engine.kill(&mut surface));
        assert_eq!(surface.to_string(), "hello\nnext");
        assert_eq!(engine.kill_ring().top().as_deref(), Some(" world"));
        assert_eq!(engine.last_kill_anchor(), Some(Position::new(0, 5)));
    }

    #[test]
    fn test_kill_at_line_end_takes_newline() {
        let mut engine = engine();
        let mut surface = MemorySurface::from_text("ab\ncd").with_caret(Position::new(0, 2));

        assert!(engine.kill(&mut surface));
        assert_eq!(surface.to_string(), "abcd");
        assert_eq!(engine.kill_ring().top().as_deref(), Some("\n"));
    }

    #[test]
    fn test_kill_at_buffer_end_does_nothing() {
        let mut engine = engine();
        let mut surface = MemorySurface::from_text("ab").with_caret(Position::new(0, 2));

        assert!(!engine.kill(&mut surface));
        assert!(engine.kill_ring().is_empty());
    }

    #[test]
    fn test_successive_kills_accumulate() {
        let mut engine = engine();
        let mut surface = MemorySurface::from_text("one\ntwo").with_caret(Position::new(0, 0));

        engine.kill(&mut surface);
        engine.kill(&mut surface);
        engine.kill(&mut surface);

        assert_eq!(surface.to_string(), "");
        assert_eq!(engine.kill_ring().len(), 1);
        assert_eq!(engine.kill_ring().top().as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn test_cut_without_region_fails() {
        let mut engine = engine();
        let mut surface = MemorySurface::from_text("abc");

        assert!(!engine.cut(&mut surface));
        assert_eq!(surface.to_string(), "abc");
        assert_eq!(engine.status().last_transient(), Some("Not in region"));
    }

    #[test]
    fn test_cut_with_rejected_delete_keeps_ring_empty() {
        let mut engine = engine();
        let range = Range::new(Position::new(0, 0), Position::new(0, 2));
        let mut surface = MemorySurface::from_text("abc")
            .with_selections(vec![Selection::new(range.start, range.end)]);
        surface.fail_deletes_at(range);

        assert!(!engine.cut(&mut surface));
        assert!(engine.kill_ring().is_empty());
        assert_eq!(surface.to_string(), "abc");
    }

    #[test]
    fn test_capitalize_keeps_rest() {
        assert_eq!(Casing::Capitalize.apply("hELLO"), "HELLO");
        assert_eq!(Casing::Capitalize.apply("word"), "Word");
        assert_eq!(Casing::Capitalize.apply(""), "");
    }

    #[test]
    fn test_word_range_touching_cursor() {
        let surface = MemorySurface::from_text("foo  bar_baz");
        assert_eq!(
            word_range_at(&surface, Position::new(0, 3)),
            Some(Range::new(Position::new(0, 0), Position::new(0, 3)))
        );
        assert_eq!(
            word_range_at(&surface, Position::new(0, 7)),
            Some(Range::new(Position::new(0, 5), Position::new(0, 12)))
        );
        assert_eq!(word_range_at(&surface, Position::new(0, 4)), None);
    }

    #[test]
    fn test_toggle_mark_clears_rectangle_mode() {
        let mut engine = engine();
        let mut surface = MemorySurface::from_text("abc");

        assert!(engine.toggle_rectangle_mark_mode(&mut surface));
        assert!(engine.toggle_mark_mode(&mut surface));
        assert!(!engine.modes().is_active(Mode::RectangleMark));

        assert!(engine.toggle_rectangle_mark_mode(&mut surface));
        assert!(!engine.modes().is_active(Mode::Mark));
    }

    #[test]
    fn test_abort_keeps_cua() {
        let mut engine = engine();
        let mut surface = MemorySurface::from_text("abc");
        engine.toggle_cua_mode();
        engine.toggle_mark_mode(&mut surface);
        engine.enter_register_chord();

        engine.abort();
        assert_eq!(engine.modes().active_modes(), vec![Mode::Cua]);
        assert!(engine.modes().chord().is_idle());
        assert_eq!(engine.status().last_transient(), Some("Quit"));
    }
}
