//! Page, navigation and content-section endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{ApiResult, LocaleQuery};
use crate::errors::AppError;
use crate::models::{ContentSectionItem, MenuItem, NavigationRow, Page};
use crate::AppState;

/// GET /api/pages?lang= - Published pages.
pub async fn list_pages(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Vec<Page>> {
    let locale = query.locale()?;
    Ok(Json(state.repo.list_pages(locale).await?))
}

/// GET /api/pages/{slug}?lang= - One published page.
pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Page> {
    let locale = query.locale()?;
    match state.repo.get_page(&slug, locale).await? {
        Some(page) => Ok(Json(page)),
        None => Err(AppError::NotFound(format!("Page {} not found", slug))),
    }
}

/// GET /api/navigation/header-menu?lang= - Header menu as a tree.
pub async fn header_menu(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Vec<MenuItem>> {
    let locale = query.locale()?;
    let rows = state.repo.navigation_rows(locale).await?;
    Ok(Json(build_menu_tree(rows)))
}

/// GET /api/content/{page_key}?lang= - Named content slots of a page.
pub async fn content_sections(
    State(state): State<AppState>,
    Path(page_key): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Vec<ContentSectionItem>> {
    let locale = query.locale()?;
    Ok(Json(state.repo.content_sections(&page_key, locale).await?))
}

/// Nest flat rows under their parents. Rows whose parent is absent are dropped.
pub fn build_menu_tree(rows: Vec<NavigationRow>) -> Vec<MenuItem> {
    let mut by_parent: HashMap<Option<i64>, Vec<NavigationRow>> = HashMap::new();
    for row in rows {
        by_parent.entry(row.parent_id).or_default().push(row);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|r| (r.position, r.id));
    }

    fn children_of(
        parent: Option<i64>,
        by_parent: &mut HashMap<Option<i64>, Vec<NavigationRow>>,
    ) -> Vec<MenuItem> {
        let Some(rows) = by_parent.remove(&parent) else {
            return Vec::new();
        };
        rows.into_iter()
            .map(|row| MenuItem {
                children: children_of(Some(row.id), by_parent),
                id: row.id,
                label: row.label,
                url: row.url,
                position: row.position,
            })
            .collect()
    }

    children_of(None, &mut by_parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, parent_id: Option<i64>, position: i64) -> NavigationRow {
        NavigationRow {
            id,
            parent_id,
            label: format!("item-{id}"),
            url: format!("/item-{id}"),
            position,
        }
    }

    #[test]
    fn test_menu_tree_nests_and_orders() {
        let tree = build_menu_tree(vec![
            row(1, None, 2),
            row(2, None, 1),
            row(3, Some(1), 2),
            row(4, Some(1), 1),
            row(5, Some(4), 0),
        ]);

        assert_eq!(tree.iter().map(|m| m.id).collect::<Vec<_>>(), vec![2, 1]);
        let about = &tree[1];
        assert_eq!(about.children.iter().map(|m| m.id).collect::<Vec<_>>(), vec![4, 3]);
        assert_eq!(about.children[0].children[0].id, 5);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_menu_tree_drops_orphans_and_self_loops() {
        let tree = build_menu_tree(vec![row(1, None, 0), row(2, Some(99), 0), row(3, Some(3), 0)]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }
}
