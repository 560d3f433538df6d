//! Actions on 2D grids: tile maps, collision layers.
//!
//! Replacing or resizing a grid captures the whole old grid. Painting only
//! captures the rectangle it overwrites, so brush strokes on large maps stay
//! cheap to record.

use std::fmt;
use std::marker::PhantomData;

use crate::abstract_editor::{EditAction, EditActionError, EditActionResult, EditContext, Editable};
use crate::grid::Grid;
use crate::selection::SelectionModel;

/// Binds the grid actions to one concrete grid.
pub trait GridPolicy: fmt::Debug + 'static {
    type Editor: Editable;
    type Data;
    type Cell: Clone + PartialEq + fmt::Debug + 'static;
    type Args: Copy + PartialEq + fmt::Debug + 'static;
    /// Cleared when the grid dimensions change.
    type Selection: SelectionModel;

    const MAX_WIDTH: usize;
    const MAX_HEIGHT: usize;
    /// Lower-case name used in action descriptions.
    const GRID_NAME: &'static str;

    fn editor_data(editor: &mut Self::Editor) -> &mut Self::Data;

    fn project_data(
        project: &mut <Self::Editor as Editable>::Project,
        item_index: usize,
    ) -> Option<&mut Self::Data>;

    fn grid(data: &mut Self::Data, args: Self::Args) -> Option<&mut Grid<Self::Cell>>;

    fn selection_mut(editor: &mut Self::Editor) -> &mut Self::Selection;
}

type Project<P> = <<P as GridPolicy>::Editor as Editable>::Project;

fn editor_grid<P: GridPolicy>(
    editor: &mut P::Editor,
    args: P::Args,
) -> Option<&mut Grid<P::Cell>> {
    let grid = P::grid(P::editor_data(editor), args);
    if grid.is_none() {
        log::warn!("Editor has no {} grid at {:?}", P::GRID_NAME, args);
    }
    grid
}

fn project_grid<P: GridPolicy>(
    project: &mut Project<P>,
    item_index: usize,
    args: P::Args,
) -> EditActionResult<&mut Grid<P::Cell>> {
    P::project_data(project, item_index)
        .and_then(|data| P::grid(data, args))
        .ok_or_else(|| {
            EditActionError::TargetNotFound(format!(
                "{} grid {:?} of resource {}",
                P::GRID_NAME,
                args,
                item_index
            ))
        })
}

fn not_applied() -> EditActionError {
    EditActionError::InvalidState("action was never applied to the project".into())
}

/// Replaces a whole grid, possibly with different dimensions.
#[derive(Debug)]
pub struct EditGrid<P: GridPolicy> {
    item_index: usize,
    args: P::Args,
    new: Grid<P::Cell>,
    old: Option<Grid<P::Cell>>,
    description: String,
}

impl<P: GridPolicy> EditGrid<P> {
    pub fn new(item_index: usize, args: P::Args, grid: Grid<P::Cell>) -> Self {
        Self {
            item_index,
            args,
            new: grid,
            old: None,
            description: format!("Edit {}", P::GRID_NAME),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn write_editor(&self, editor: &mut P::Editor, grid: &Grid<P::Cell>) {
        let resized = match editor_grid::<P>(editor, self.args) {
            Some(target) => {
                let resized = target.size() != grid.size();
                *target = grid.clone();
                resized
            }
            None => false,
        };
        if resized {
            P::selection_mut(editor).clear_selection();
        }
    }

    fn write(
        &self,
        editor: &mut P::Editor,
        project: &mut Project<P>,
        grid: &Grid<P::Cell>,
    ) -> EditActionResult {
        *project_grid::<P>(project, self.item_index, self.args)? = grid.clone();
        self.write_editor(editor, grid);
        Ok(())
    }
}

impl<P: GridPolicy> EditAction<P::Editor> for EditGrid<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        self.write_editor(editor, &self.new);
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        let grid = project_grid::<P>(project, self.item_index, self.args)?;
        if *grid == self.new {
            return Ok(false);
        }
        self.old = Some(std::mem::replace(grid, self.new.clone()));
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        let old = self.old.as_ref().ok_or_else(not_applied)?;
        self.write(editor, project, old)
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.write(editor, project, &self.new)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Overwrites a rectangle of cells.
///
/// A region that does not lie inside the grid is rejected before either
/// copy is touched. [`GridActions`] clips regions before building the action.
#[derive(Debug)]
pub struct EditGridRegion<P: GridPolicy> {
    item_index: usize,
    args: P::Args,
    x: usize,
    y: usize,
    new: Grid<P::Cell>,
    old: Option<Grid<P::Cell>>,
    description: String,
}

impl<P: GridPolicy> EditGridRegion<P> {
    pub fn new(item_index: usize, args: P::Args, x: usize, y: usize, cells: Grid<P::Cell>) -> Self {
        Self {
            item_index,
            args,
            x,
            y,
            new: cells,
            old: None,
            description: format!("Paint {}", P::GRID_NAME),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn fits(&self, grid: &Grid<P::Cell>) -> bool {
        let (width, height) = self.new.size();
        self.x.checked_add(width).is_some_and(|end| end <= grid.width())
            && self.y.checked_add(height).is_some_and(|end| end <= grid.height())
    }

    fn out_of_bounds(&self, grid: &Grid<P::Cell>) -> EditActionError {
        let (width, height) = self.new.size();
        if self.x.saturating_add(width) > grid.width() {
            EditActionError::IndexOutOfBounds {
                index: self.x.saturating_add(width),
                len: grid.width(),
            }
        } else {
            EditActionError::IndexOutOfBounds {
                index: self.y.saturating_add(height),
                len: grid.height(),
            }
        }
    }

    fn write(
        &self,
        editor: &mut P::Editor,
        project: &mut Project<P>,
        cells: &Grid<P::Cell>,
    ) -> EditActionResult {
        project_grid::<P>(project, self.item_index, self.args)?.paste(self.x, self.y, cells);
        if let Some(grid) = editor_grid::<P>(editor, self.args) {
            grid.paste(self.x, self.y, cells);
        }
        Ok(())
    }
}

impl<P: GridPolicy> EditAction<P::Editor> for EditGridRegion<P> {
    fn first_do_editor_data(&mut self, editor: &mut P::Editor) {
        let Some(grid) = editor_grid::<P>(editor, self.args) else {
            return;
        };
        if self.fits(grid) {
            grid.paste(self.x, self.y, &self.new);
        } else {
            log::warn!(
                "{} region at ({}, {}) does not fit the editor grid",
                P::GRID_NAME,
                self.x,
                self.y
            );
        }
    }

    fn first_do_project_file(&mut self, project: &mut Project<P>) -> EditActionResult<bool> {
        let grid = project_grid::<P>(project, self.item_index, self.args)?;
        if !self.fits(grid) {
            return Err(self.out_of_bounds(grid));
        }
        let (width, height) = self.new.size();
        let old = grid.subgrid(self.x, self.y, width, height);
        if old == self.new {
            return Ok(false);
        }
        grid.paste(self.x, self.y, &self.new);
        self.old = Some(old);
        Ok(true)
    }

    fn undo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        let old = self.old.as_ref().ok_or_else(not_applied)?;
        self.write(editor, project, old)
    }

    fn redo(&mut self, editor: &mut P::Editor, project: &mut Project<P>) -> EditActionResult {
        self.write(editor, project, &self.new)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Edit helpers for the grid described by `P`.
pub struct GridActions<P>(PhantomData<P>);

type Ctx<'a, 'b, P> = &'a mut EditContext<'b, <P as GridPolicy>::Editor>;

impl<P: GridPolicy> GridActions<P> {
    fn check_size(width: usize, height: usize) -> EditActionResult {
        if width > P::MAX_WIDTH {
            return Err(EditActionError::CapacityExceeded {
                requested: width,
                max: P::MAX_WIDTH,
            });
        }
        if height > P::MAX_HEIGHT {
            return Err(EditActionError::CapacityExceeded {
                requested: height,
                max: P::MAX_HEIGHT,
            });
        }
        Ok(())
    }

    fn editor_grid<'a>(
        ctx: &'a mut EditContext<'_, P::Editor>,
        args: P::Args,
    ) -> EditActionResult<&'a mut Grid<P::Cell>> {
        editor_grid::<P>(ctx.editor, args).ok_or_else(|| {
            EditActionError::TargetNotFound(format!("{} grid {:?} in editor", P::GRID_NAME, args))
        })
    }

    /// Replaces the whole grid.
    pub fn set_grid(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        grid: Grid<P::Cell>,
    ) -> EditActionResult<bool> {
        Self::check_size(grid.width(), grid.height())?;
        let item_index = ctx.item_index();
        ctx.add_action(EditGrid::<P>::new(item_index, args, grid))
    }

    /// Records a change the UI already made to the editor copy of the grid.
    pub fn grid_edited(ctx: Ctx<'_, '_, P>, args: P::Args) -> EditActionResult<bool> {
        let grid = Self::editor_grid(ctx, args)?.clone();
        Self::set_grid(ctx, args, grid)
    }

    /// Resizes the grid, keeping cell coordinates and filling new cells with
    /// the default cell.
    pub fn resize(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        width: usize,
        height: usize,
    ) -> EditActionResult<bool>
    where
        P::Cell: Default,
    {
        Self::check_size(width, height)?;
        let grid = Self::editor_grid(ctx, args)?.resized(width, height, P::Cell::default());
        let item_index = ctx.item_index();
        let action = EditGrid::<P>::new(item_index, args, grid)
            .with_description(format!("Resize {}", P::GRID_NAME));
        ctx.add_action(action)
    }

    /// Paints `cells` with its top-left corner at (`x`, `y`).
    ///
    /// Cells outside the grid are dropped.
    pub fn set_cells(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        x: usize,
        y: usize,
        cells: Grid<P::Cell>,
    ) -> EditActionResult<bool> {
        let (width, height) = Self::editor_grid(ctx, args)?.size();
        let cells = cells.subgrid(
            0,
            0,
            width.saturating_sub(x),
            height.saturating_sub(y),
        );
        if cells.is_empty() {
            return Ok(false);
        }
        let item_index = ctx.item_index();
        ctx.add_action(EditGridRegion::<P>::new(item_index, args, x, y, cells))
    }

    /// Records cells the UI already painted into the editor copy.
    pub fn cells_edited(
        ctx: Ctx<'_, '_, P>,
        args: P::Args,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> EditActionResult<bool> {
        let cells = Self::editor_grid(ctx, args)?.subgrid(x, y, width, height);
        if cells.is_empty() {
            return Ok(false);
        }
        let item_index = ctx.item_index();
        ctx.add_action(EditGridRegion::<P>::new(item_index, args, x, y, cells))
    }
}
