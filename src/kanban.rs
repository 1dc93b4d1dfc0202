//! Board view assembly for the task board.

use std::collections::HashMap;

use crate::models::*;
use crate::repo::{KanbanRepo, RepoResult};

/// Position for a new entry appended after `existing`; the first entry gets 1.
pub fn next_order(existing: impl IntoIterator<Item = i32>) -> i32 {
    existing.into_iter().max().unwrap_or(0) + 1
}

/// Groups `tasks` under their columns. Columns and tasks come out sorted by
/// `order`; tasks whose column is not in `columns` are dropped.
pub fn assemble_board(board: KanbanBoard, mut columns: Vec<KanbanColumn>, tasks: Vec<KanbanTask>) -> BoardView {
    columns.sort_by_key(|c| c.order);
    let mut by_column: HashMap<Id, Vec<KanbanTask>> = HashMap::new();
    for task in tasks {
        by_column.entry(task.column_id).or_default().push(task);
    }
    let columns = columns
        .into_iter()
        .map(|column| {
            let mut tasks = by_column.remove(&column.id).unwrap_or_default();
            tasks.sort_by_key(|t| t.order);
            ColumnView { column, tasks }
        })
        .collect();
    BoardView { board, columns }
}

pub async fn load_board_view<R: KanbanRepo + ?Sized>(repo: &R, board_id: Id) -> RepoResult<BoardView> {
    let board = repo.get_board(board_id).await?;
    let columns = repo.list_columns(board_id).await?;
    let tasks = repo.list_tasks(board_id).await?;
    Ok(assemble_board(board, columns, tasks))
}

pub fn require_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        Err("title is required".into())
    } else {
        Ok(())
    }
}
