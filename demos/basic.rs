// Example: one scroll pass over a long list, then an idle pass that trims the spare pool.
use virtualizer_cache::{
    BuildResult, CacheOptions, ItemBuilder, PurgeContext, RenderCacheController, RenderHandle,
};

#[derive(Default)]
struct Rows {
    next: u32,
}

impl ItemBuilder<String> for Rows {
    fn build_or_update(&mut self, index: i64) -> BuildResult<String> {
        self.next += 1;
        BuildResult::created(RenderHandle::new(self.next), format!("row {index}"))
    }

    fn purge(&mut self, purge: &mut PurgeContext<'_, String>) {
        // keep at most four spare rows around
        let spare = purge.spare_handles();
        let excess = spare.len().saturating_sub(4);
        for handle in spare.into_iter().take(excess) {
            purge.remove(handle);
        }
    }
}

fn main() {
    let mut cache = RenderCacheController::new(CacheOptions::new(10_000), Rows::default());

    // First frame: rows 0..=9 visible, two rows of padding on each side.
    cache.set_active_range(0, 9, 2, 2, false);
    for i in 0..=11 {
        cache.get_item(i, true);
    }
    cache.run_idle();
    println!("after first frame: {:?}", cache.snapshot());

    // Scroll down by 20 rows.
    cache.set_active_range(20, 29, 2, 2, false);
    for i in 18..=31 {
        cache.get_item(i, true);
    }
    cache.run_idle();

    let (outcome, row) = cache.get_item(25, false);
    println!("row 25: {outcome:?} {:?}", row.and_then(|e| e.node()));
    print!("{}", cache.dump_cache_state());
}
