// Example: a looping carousel whose window wraps past the end of the sequence.
use virtualizer_cache::{BuildResult, CacheOptions, FnBuilder, RenderCacheController, RenderHandle};

fn main() {
    let mut next = 0u32;
    let builder = FnBuilder(move |index: i64| {
        next += 1;
        BuildResult::created(RenderHandle::new(next), format!("slide {index}"))
    });
    let mut cache: RenderCacheController<String, _> =
        RenderCacheController::new(CacheOptions::new(8), builder);

    for i in 0..8 {
        cache.get_item(i, true);
    }

    // Slide 7 is centered; its neighbours 6 and 0 are visible.
    cache.set_active_range(6, 0, 1, 1, true);
    println!("window: {}", cache.active_window());
    cache.run_idle();
    for handle in cache.children() {
        let slide = cache.lookup(*handle).and_then(|e| e.node());
        println!("  {handle} {slide:?}");
    }

    // Swiping forward keeps slides one period away in the active tier.
    cache.set_active_range(0, 2, 2, 2, true);
    println!("window: {}", cache.active_window());
    print!("{}", cache.dump_cache_state());
}
