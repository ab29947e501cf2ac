// Example: drag an item through a list, then commit the reorder.
use virtualizer_cache::{BuildResult, CacheOptions, ItemBuilder, RenderCacheController, RenderHandle};

struct Cards {
    labels: Vec<&'static str>,
}

impl ItemBuilder<&'static str> for Cards {
    fn build_or_update(&mut self, index: i64) -> BuildResult<&'static str> {
        let Some(label) = usize::try_from(index).ok().and_then(|i| self.labels.get(i)) else {
            return BuildResult::Failed;
        };
        BuildResult::created(RenderHandle::new(index as u32 + 1), *label)
    }

    fn notify_move(&mut self, from: i64, to: i64) {
        if from < 0 {
            println!("builder: move finished");
            return;
        }
        let card = self.labels.remove(from as usize);
        self.labels.insert(to as usize, card);
        println!("builder: data now {:?}", self.labels);
    }
}

fn print_order(cache: &mut RenderCacheController<&'static str, Cards>) {
    let order: Vec<&str> = (0..5)
        .filter_map(|i| cache.get_item(i, false).1.and_then(|e| e.node().copied()))
        .collect();
    println!("display: {order:?}");
}

fn main() {
    let cards = Cards {
        labels: vec!["a", "b", "c", "d", "e"],
    };
    let mut cache = RenderCacheController::new(CacheOptions::new(5), cards);
    cache.set_active_range(0, 4, 0, 0, false);
    for i in 0..5 {
        cache.get_item(i, true);
    }
    print_order(&mut cache);

    // The finger passes over two slots before it is released.
    cache.move_item(1, 2);
    cache.move_item(2, 3);
    print_order(&mut cache);

    cache.commit_move();
    cache.run_idle();
    print_order(&mut cache);
    println!("children: {:?}", cache.children());
}
