//! Headless editing session over a sample sprite project.
//!
//! A [`SpriteEditor`] edits one sprite of a [`Project`]: its frame list, the
//! objects of each frame and a tilemap. A scripted list of [`Command`]s plays
//! the part of the user, one command per frame, and selections are committed
//! at the end of every frame the way an interactive host does it.

use spritework_core::abstract_editor::{
    EditAction, EditActionError, EditActionHistory, EditActionResult, EditContext, Editable,
};
use spritework_core::grid::Grid;
use spritework_core::list_actions::{
    EditListAction, GridActions, GridPolicy, ListActions, ListPolicy,
};
use spritework_core::selection::{
    ListSelection, MultipleSelection, ParentedMultipleSelection, SelectionModel, SingleSelection,
};

use crate::history_panel;

pub const MAX_FRAMES: usize = 32;
pub const MAX_FRAME_OBJECTS: usize = 16;
pub const MAX_TILEMAP_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// Project data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameObject {
    pub x: i32,
    pub y: i32,
    pub tile: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub duration: u32,
    pub objects: Vec<FrameObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprite {
    pub name: String,
    pub frames: Vec<Frame>,
    pub tiles: Grid<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub sprites: Vec<Sprite>,
}

impl Project {
    /// A project with one small sprite to edit.
    pub fn sample() -> Self {
        let object = |x, y, tile| FrameObject { x, y, tile };
        Self {
            sprites: vec![Sprite {
                name: "hero".into(),
                frames: vec![
                    Frame {
                        duration: 4,
                        objects: vec![object(0, 0, 1), object(8, 0, 2)],
                    },
                    Frame {
                        duration: 4,
                        objects: vec![object(0, 0, 3), object(8, 0, 4), object(0, 8, 5)],
                    },
                    Frame {
                        duration: 6,
                        objects: vec![object(0, 0, 6)],
                    },
                ],
                tiles: Grid::filled(8, 8, 0),
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// Frame selection plus the object selection nested under it.
///
/// Edits to the frame list renumber the parent of the object selection so it
/// keeps pointing at the same frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSelection {
    pub frames: MultipleSelection,
    pub objects: ParentedMultipleSelection,
}

impl SelectionModel for FrameSelection {
    fn update(&mut self) {
        self.frames.update();
        self.objects.update();
    }

    fn is_selection_changing(&self) -> bool {
        self.frames.is_selection_changing() || self.objects.is_selection_changing()
    }

    fn clear_selection(&mut self) {
        self.frames.clear_selection();
        self.objects.clear_selection();
    }
}

impl ListSelection<()> for FrameSelection {
    fn selected_list(&self) -> Option<()> {
        self.frames.selected_list()
    }

    fn selected_indexes(&self, args: ()) -> Vec<usize> {
        self.frames.selected_indexes(args)
    }

    fn item_added(&mut self, args: (), index: usize) {
        self.frames.item_added(args, index);
        self.objects.parent_added(index);
    }

    fn item_removed(&mut self, args: (), index: usize) {
        self.frames.item_removed(args, index);
        self.objects.parent_removed(index);
    }

    fn item_moved(&mut self, args: (), from: usize, to: usize) {
        self.frames.item_moved(args, from, to);
        self.objects.parent_moved(from, to);
    }

    fn select_item(&mut self, args: (), index: usize) {
        self.frames.select_item(args, index);
    }

    fn select_items(&mut self, args: (), indexes: &[usize]) {
        self.frames.select_items(args, indexes);
    }
}

/// View state refreshed after undo/redo.
#[derive(Debug, Default)]
pub struct SpriteView {
    pub title: String,
    pub refreshes: u32,
}

pub struct SpriteEditor {
    pub index: usize,
    pub sprite: Sprite,
    pub selection: FrameSelection,
    pub tile_cursor: SingleSelection,
}

impl SpriteEditor {
    /// Opens an editor on a copy of sprite `index`.
    pub fn open(project: &Project, index: usize) -> EditActionResult<Self> {
        let sprite = project
            .sprites
            .get(index)
            .cloned()
            .ok_or_else(|| EditActionError::TargetNotFound(format!("sprite {index}")))?;
        Ok(Self {
            index,
            sprite,
            selection: FrameSelection::default(),
            tile_cursor: SingleSelection::new(),
        })
    }
}

impl Editable for SpriteEditor {
    type Project = Project;
    type Gui = SpriteView;

    fn item_index(&self) -> usize {
        self.index
    }

    fn update_selection(&mut self) {
        self.selection.update();
        self.tile_cursor.update();
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Frames;

impl ListPolicy for Frames {
    type Editor = SpriteEditor;
    type Data = Sprite;
    type Item = Frame;
    type Args = ();
    type Selection = FrameSelection;

    const MAX_SIZE: usize = MAX_FRAMES;
    const ITEM_NAME: &'static str = "frame";

    fn editor_data(editor: &mut SpriteEditor) -> &mut Sprite {
        &mut editor.sprite
    }

    fn project_data(project: &mut Project, item_index: usize) -> Option<&mut Sprite> {
        project.sprites.get_mut(item_index)
    }

    fn list(sprite: &mut Sprite, _args: ()) -> Option<&mut Vec<Frame>> {
        Some(&mut sprite.frames)
    }

    fn selection(editor: &SpriteEditor) -> &FrameSelection {
        &editor.selection
    }

    fn selection_mut(editor: &mut SpriteEditor) -> &mut FrameSelection {
        &mut editor.selection
    }
}

/// Objects of the frame given by `Args`.
#[derive(Debug)]
pub struct FrameObjects;

impl ListPolicy for FrameObjects {
    type Editor = SpriteEditor;
    type Data = Sprite;
    type Item = FrameObject;
    type Args = usize;
    type Selection = ParentedMultipleSelection;

    const MAX_SIZE: usize = MAX_FRAME_OBJECTS;
    const ITEM_NAME: &'static str = "frame object";

    fn editor_data(editor: &mut SpriteEditor) -> &mut Sprite {
        &mut editor.sprite
    }

    fn project_data(project: &mut Project, item_index: usize) -> Option<&mut Sprite> {
        project.sprites.get_mut(item_index)
    }

    fn list(sprite: &mut Sprite, frame: usize) -> Option<&mut Vec<FrameObject>> {
        sprite.frames.get_mut(frame).map(|f| &mut f.objects)
    }

    fn selection(editor: &SpriteEditor) -> &ParentedMultipleSelection {
        &editor.selection.objects
    }

    fn selection_mut(editor: &mut SpriteEditor) -> &mut ParentedMultipleSelection {
        &mut editor.selection.objects
    }
}

#[derive(Debug)]
pub struct Tilemap;

impl GridPolicy for Tilemap {
    type Editor = SpriteEditor;
    type Data = Sprite;
    type Cell = u16;
    type Args = ();
    type Selection = SingleSelection;

    const MAX_WIDTH: usize = MAX_TILEMAP_SIZE;
    const MAX_HEIGHT: usize = MAX_TILEMAP_SIZE;
    const GRID_NAME: &'static str = "tilemap";

    fn editor_data(editor: &mut SpriteEditor) -> &mut Sprite {
        &mut editor.sprite
    }

    fn project_data(project: &mut Project, item_index: usize) -> Option<&mut Sprite> {
        project.sprites.get_mut(item_index)
    }

    fn grid(sprite: &mut Sprite, _args: ()) -> Option<&mut Grid<u16>> {
        Some(&mut sprite.tiles)
    }

    fn selection_mut(editor: &mut SpriteEditor) -> &mut SingleSelection {
        &mut editor.tile_cursor
    }
}

fn duration(frame: &mut Frame) -> &mut u32 {
    &mut frame.duration
}

/// Renames the sprite. Refreshes the view title on undo/redo.
#[derive(Debug)]
struct RenameSprite {
    item_index: usize,
    name: String,
    old: Option<String>,
}

impl RenameSprite {
    fn sprite(project: &mut Project, index: usize) -> EditActionResult<&mut Sprite> {
        project
            .sprites
            .get_mut(index)
            .ok_or_else(|| EditActionError::TargetNotFound(format!("sprite {index}")))
    }
}

impl EditAction<SpriteEditor> for RenameSprite {
    fn first_do_editor_data(&mut self, editor: &mut SpriteEditor) {
        editor.sprite.name.clone_from(&self.name);
    }

    fn first_do_project_file(&mut self, project: &mut Project) -> EditActionResult<bool> {
        let sprite = Self::sprite(project, self.item_index)?;
        if sprite.name == self.name {
            return Ok(false);
        }
        self.old = Some(std::mem::replace(&mut sprite.name, self.name.clone()));
        Ok(true)
    }

    fn undo(&mut self, editor: &mut SpriteEditor, project: &mut Project) -> EditActionResult {
        let old = self
            .old
            .clone()
            .ok_or_else(|| EditActionError::InvalidState("rename was never applied".into()))?;
        Self::sprite(project, self.item_index)?.name.clone_from(&old);
        editor.sprite.name = old;
        Ok(())
    }

    fn redo(&mut self, editor: &mut SpriteEditor, project: &mut Project) -> EditActionResult {
        Self::sprite(project, self.item_index)?.name.clone_from(&self.name);
        editor.sprite.name.clone_from(&self.name);
        Ok(())
    }

    fn description(&self) -> &str {
        "Rename sprite"
    }

    fn notify_gui(&self, view: &mut SpriteView) {
        view.title.clear();
        view.refreshes += 1;
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectFrames(Vec<usize>),
    SelectObjects(usize, Vec<usize>),
    Frames(EditListAction),
    Objects(EditListAction),
    SetDuration(u32),
    Rename(String),
    /// Paints a `width` x `height` block of one tile.
    Paint {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        tile: u16,
    },
    ResizeTilemap(usize, usize),
    /// Runs the commands as one undo step.
    Macro(String, Vec<Command>),
    Undo,
    Redo,
    Save,
}

/// The scripted interaction played by the headless host.
pub fn demo_script() -> Vec<Command> {
    use Command::*;
    vec![
        SelectFrames(vec![0, 2]),
        Frames(EditListAction::Clone),
        SetDuration(8),
        Frames(EditListAction::Raise),
        SelectObjects(2, vec![0, 2]),
        Objects(EditListAction::LowerToBottom),
        Rename("hero_run".into()),
        Paint {
            x: 2,
            y: 2,
            width: 3,
            height: 2,
            tile: 7,
        },
        Save,
        Undo,
        Undo,
        Redo,
        Macro(
            "Rebuild tilemap".into(),
            vec![
                ResizeTilemap(12, 10),
                Paint {
                    x: 10,
                    y: 8,
                    width: 4,
                    height: 4,
                    tile: 3,
                },
            ],
        ),
        ResizeTilemap(MAX_TILEMAP_SIZE + 1, 8),
        SelectFrames(vec![1]),
        Frames(EditListAction::Remove),
        Undo,
        Objects(EditListAction::Add),
        Redo,
    ]
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: usize,
    pub failed: usize,
    pub undo_count: usize,
    pub redo_count: usize,
    pub unsaved: bool,
}

/// A project, one editor on it, its history and its view.
pub struct Session {
    pub history: EditActionHistory<SpriteEditor>,
    pub editor: SpriteEditor,
    pub project: Project,
    pub view: SpriteView,
}

impl Session {
    pub fn new(project: Project, sprite: usize, max_undo: usize) -> EditActionResult<Self> {
        let editor = SpriteEditor::open(&project, sprite)?;
        let view = SpriteView {
            title: editor.sprite.name.clone(),
            refreshes: 0,
        };
        Ok(Self {
            history: EditActionHistory::new(max_undo),
            editor,
            project,
            view,
        })
    }

    fn ctx(&mut self) -> EditContext<'_, SpriteEditor> {
        EditContext::new(&mut self.history, &mut self.editor, &mut self.project)
    }

    /// Plays `commands`, one per frame, for at most `max_frames` frames.
    ///
    /// A failed command is logged and the session carries on, the way an
    /// interactive editor reports a rejected edit and keeps running.
    pub fn run(&mut self, commands: &[Command], max_frames: Option<usize>) -> SessionSummary {
        let limit = max_frames.unwrap_or(commands.len());
        let mut failed = 0;
        let mut frames = 0;
        for command in commands.iter().take(limit) {
            frames += 1;
            match self.step(command) {
                Ok(true) => log::debug!("frame {frames}: {command:?}"),
                Ok(false) => log::debug!("frame {frames}: {command:?} changed nothing"),
                Err(e) => {
                    failed += 1;
                    log::warn!("frame {frames}: {command:?} failed: {e}");
                }
            }
            self.end_frame();
        }
        history_panel::log_history(&self.history);
        SessionSummary {
            frames,
            failed,
            undo_count: self.history.undo_count(),
            redo_count: self.history.redo_count(),
            unsaved: self.history.has_unsaved_changes(),
        }
    }

    /// Commits the frame's selections and refreshes the view.
    pub fn end_frame(&mut self) {
        self.editor.update_selection();
        if self.view.title.is_empty() {
            self.view.title.clone_from(&self.editor.sprite.name);
        }
    }

    /// Applies one command. Returns whether anything changed.
    pub fn step(&mut self, command: &Command) -> EditActionResult<bool> {
        match command {
            Command::SelectFrames(indexes) => {
                self.editor.selection.frames.set_selected_indexes(indexes);
                Ok(true)
            }
            Command::SelectObjects(frame, indexes) => {
                self.editor
                    .selection
                    .objects
                    .set_selected_indexes(*frame, indexes);
                Ok(true)
            }
            Command::Frames(action) => {
                ListActions::<Frames>::edit_list(&mut self.ctx(), (), *action)
            }
            Command::Objects(action) => {
                let Some(frame) = self.editor.selection.objects.parent_index() else {
                    return Ok(false);
                };
                ListActions::<FrameObjects>::edit_list(&mut self.ctx(), frame, *action)
            }
            Command::SetDuration(value) => ListActions::<Frames>::selected_field_edited(
                &mut self.ctx(),
                (),
                duration,
                *value,
                "duration",
            ),
            Command::Rename(name) => {
                let action = RenameSprite {
                    item_index: self.editor.index,
                    name: name.clone(),
                    old: None,
                };
                self.ctx().add_action(action)
            }
            Command::Paint {
                x,
                y,
                width,
                height,
                tile,
            } => GridActions::<Tilemap>::set_cells(
                &mut self.ctx(),
                (),
                *x,
                *y,
                Grid::filled(*width, *height, *tile),
            ),
            Command::ResizeTilemap(width, height) => {
                GridActions::<Tilemap>::resize(&mut self.ctx(), (), *width, *height)
            }
            Command::Macro(description, commands) => self.run_macro(description, commands),
            Command::Undo => {
                EditContext::new(&mut self.history, &mut self.editor, &mut self.project)
                    .undo(&mut self.view)?;
                Ok(true)
            }
            Command::Redo => {
                EditContext::new(&mut self.history, &mut self.editor, &mut self.project)
                    .redo(&mut self.view)?;
                Ok(true)
            }
            Command::Save => {
                self.history.mark_saved();
                log::info!("Saved sprite \"{}\"", self.editor.sprite.name);
                Ok(true)
            }
        }
    }

    fn run_macro(&mut self, description: &str, commands: &[Command]) -> EditActionResult<bool> {
        let handle = self.history.start_macro(description);
        let mut result = Ok(false);
        for command in commands {
            match self.step(command) {
                Ok(changed) => result = result.map(|c| c || changed),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        let recorded = self.history.end_macro(handle);
        result.map(|changed| changed && recorded)
    }
}
