use crate::grid::Grid;
use crate::province::{ProvinceDraft, ProvinceKind};
use log::info;
use std::collections::VecDeque;

/// Подбирает оставшуюся свободную сушу в провинции-острова.
///
/// Обход по строкам, заливка в ширину по 4 соседям; генератор не используется.
/// После этого этапа у каждой клетки суши ровно одна провинция.
pub fn build_islands(grid: &mut Grid, first_id: u32) -> Vec<ProvinceDraft> {
    let mut drafts = Vec::new();
    let mut current_id = first_id;

    for start in 0..grid.tiles.len() {
        if !is_unclaimed(grid, start) {
            continue;
        }

        let mut queue = VecDeque::new();
        grid.tiles[start].region = Some(current_id);
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            let next: Vec<usize> = grid.neighbors(idx).collect();
            for n in next {
                if is_unclaimed(grid, n) {
                    grid.tiles[n].region = Some(current_id);
                    queue.push_back(n);
                }
            }
        }

        drafts.push(ProvinceDraft {
            id: current_id,
            name: format!("Island_{current_id}"),
            kind: ProvinceKind::Island,
        });
        current_id += 1;
    }

    info!("Острова: {} провинций", drafts.len());
    drafts
}

fn is_unclaimed(grid: &Grid, idx: usize) -> bool {
    let tile = &grid.tiles[idx];
    tile.terrain.is_land() && tile.region.is_none()
}
