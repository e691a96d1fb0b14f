//! Scraped-listing inventory: loads the newest product export per source
//! directory, collapses near-duplicate listings, and serves filtered,
//! sorted views over them.

mod dedupe;
mod query;
mod rows;

pub use dedupe::{canonical_url, dedupe, title_key};
pub use query::SortOrder;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use common::probes::{FileProbe, RowReader};
use common::product::{ProductSource, ScrapedProduct};

pub const PRODUCT_FILE_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

struct InventoryState {
    items: Arc<Vec<ScrapedProduct>>,
    source_path: Option<PathBuf>,
    source_mtime: u64,
}

/// Staleness-guarded owner of one source's scraped listings. Unlike the
/// price index, a vanished export file does NOT clear the inventory: the
/// listings were real when scraped and stay servable until a newer export
/// replaces them.
pub struct ProductInventory {
    products_dir: PathBuf,
    default_source: ProductSource,
    probe: Box<dyn FileProbe>,
    reader: Box<dyn RowReader>,
    state: Mutex<InventoryState>,
}

impl ProductInventory {
    pub fn new(
        products_dir: impl Into<PathBuf>,
        default_source: ProductSource,
        probe: Box<dyn FileProbe>,
        reader: Box<dyn RowReader>,
    ) -> Self {
        Self {
            products_dir: products_dir.into(),
            default_source,
            probe,
            reader,
            state: Mutex::new(InventoryState {
                items: Arc::new(Vec::new()),
                source_path: None,
                source_mtime: 0,
            }),
        }
    }

    /// Current listing snapshot, rebuilding first if the backing export
    /// moved on.
    pub fn current(&self) -> Arc<Vec<ScrapedProduct>> {
        let mut state = self.lock_state();

        match self
            .probe
            .newest_file(&self.products_dir, PRODUCT_FILE_EXTENSIONS)
        {
            Some((path, mtime)) => {
                let unchanged = state.source_path.as_deref() == Some(path.as_path())
                    && mtime <= state.source_mtime;
                if !unchanged {
                    self.rebuild(&mut state, path, mtime);
                }
            }
            None => {
                debug!(
                    "No product export in {}; serving the last snapshot",
                    self.products_dir.display()
                );
            }
        }

        Arc::clone(&state.items)
    }

    /// Force a rebuild from the then-current newest export, keeping the
    /// old snapshot when no export exists.
    pub fn refresh(&self) {
        let mut state = self.lock_state();

        match self
            .probe
            .newest_file(&self.products_dir, PRODUCT_FILE_EXTENSIONS)
        {
            Some((path, mtime)) => self.rebuild(&mut state, path, mtime),
            None => warn!(
                "No product export in {}; keeping {} listings",
                self.products_dir.display(),
                state.items.len()
            ),
        }
    }

    pub fn search(&self, query: &str, order: SortOrder) -> Vec<ScrapedProduct> {
        query::filter_sort(&self.current(), query, order)
    }

    pub fn search_by_source(
        &self,
        query: &str,
        order: SortOrder,
        source: ProductSource,
    ) -> Vec<ScrapedProduct> {
        query::filter_sort(&self.current(), query, order)
            .into_iter()
            .filter(|product| product.source == source)
            .collect()
    }

    /// Distinct titles matching every query token, alphabetical, for
    /// autocomplete. Distinctness is judged on the dedup title key so
    /// "Booster  Box™" and "booster box" count once.
    pub fn suggest_titles(&self, query: &str, limit: usize) -> Vec<String> {
        let tokens = query::query_tokens(query);
        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();

        for product in self.current().iter() {
            if !query::title_matches(&product.title, &tokens) {
                continue;
            }
            if seen.insert(title_key(&product.title)) {
                suggestions.push(product.title.clone());
            }
        }

        suggestions.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        suggestions.truncate(limit);
        suggestions
    }

    fn rebuild(&self, state: &mut InventoryState, path: PathBuf, mtime: u64) {
        let items = match self.reader.read_rows(&path) {
            Ok(source_rows) => {
                let mut skipped = 0usize;
                let products: Vec<ScrapedProduct> = source_rows
                    .iter()
                    .filter_map(|row| {
                        let product = rows::extract_product(row, self.default_source);
                        if product.is_none() {
                            skipped += 1;
                        }
                        product
                    })
                    .collect();
                let extracted = products.len();
                let products = dedupe(products);

                info!(
                    "Loaded {} listings ({} skipped, {} duplicates) from {}",
                    products.len(),
                    skipped,
                    extracted - products.len(),
                    path.display()
                );

                products
            }
            Err(err) => {
                warn!("Failed to read product export {}: {}", path.display(), err);
                Vec::new()
            }
        };

        state.items = Arc::new(items);
        state.source_path = Some(path);
        state.source_mtime = mtime;
    }

    fn lock_state(&self) -> MutexGuard<'_, InventoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use common::probes::RowReadError;
    use common::row::SourceRow;

    #[derive(Clone, Default)]
    struct FakeProbe {
        newest: Arc<Mutex<Option<(PathBuf, u64)>>>,
    }

    impl FakeProbe {
        fn set(&self, path: &str, mtime: u64) {
            *self.newest.lock().unwrap() = Some((PathBuf::from(path), mtime));
        }

        fn clear(&self) {
            *self.newest.lock().unwrap() = None;
        }
    }

    impl FileProbe for FakeProbe {
        fn newest_file(&self, _dir: &Path, _extensions: &[&str]) -> Option<(PathBuf, u64)> {
            self.newest.lock().unwrap().clone()
        }
    }

    #[derive(Clone, Default)]
    struct FakeReader {
        rows: Arc<Mutex<Vec<SourceRow>>>,
        reads: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl FakeReader {
        fn set_rows(&self, rows: Vec<SourceRow>) {
            *self.rows.lock().unwrap() = rows;
        }

        fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl RowReader for FakeReader {
        fn read_rows(&self, path: &Path) -> Result<Vec<SourceRow>, RowReadError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(RowReadError::Malformed(
                    path.to_path_buf(),
                    "truncated sheet".to_string(),
                ));
            }
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn listing_row(title: &str, price: &str, url: &str) -> SourceRow {
        [("title", title), ("price", price), ("url", url)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn inventory(probe: &FakeProbe, reader: &FakeReader) -> ProductInventory {
        ProductInventory::new(
            "products",
            ProductSource::Skroutz,
            Box::new(probe.clone()),
            Box::new(reader.clone()),
        )
    }

    #[test]
    fn loads_lazily_and_only_once_per_mtime() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![listing_row("Booster Box", "140,00", "https://x.gr/a")]);

        let inventory = inventory(&probe, &reader);
        assert_eq!(inventory.search("booster", SortOrder::default()).len(), 1);
        assert_eq!(inventory.search("booster", SortOrder::default()).len(), 1);
        assert_eq!(reader.reads(), 1);
    }

    #[test]
    fn vanished_export_keeps_the_last_snapshot() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![listing_row("Booster Box", "140,00", "https://x.gr/a")]);

        let inventory = inventory(&probe, &reader);
        assert_eq!(inventory.current().len(), 1);

        probe.clear();
        assert_eq!(inventory.current().len(), 1);
        inventory.refresh();
        assert_eq!(inventory.current().len(), 1);
    }

    #[test]
    fn rebuilds_when_mtime_advances() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![listing_row("Booster Box", "140,00", "https://x.gr/a")]);

        let inventory = inventory(&probe, &reader);
        assert_eq!(inventory.current().len(), 1);

        reader.set_rows(vec![
            listing_row("Booster Box", "140,00", "https://x.gr/a"),
            listing_row("Elite Trainer Box", "45,00", "https://x.gr/b"),
        ]);
        probe.set("products/latest.csv", 200);
        assert_eq!(inventory.current().len(), 2);
    }

    #[test]
    fn unreadable_export_empties_the_inventory() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![listing_row("Booster Box", "140,00", "https://x.gr/a")]);

        let inventory = inventory(&probe, &reader);
        assert_eq!(inventory.current().len(), 1);

        reader.set_fail(true);
        probe.set("products/latest.csv", 200);
        assert!(inventory.current().is_empty());
    }

    #[test]
    fn duplicates_collapse_during_rebuild() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![
            listing_row("Booster Box™", "140,00", "https://www.x.gr/a/"),
            listing_row("Booster  Box", "140,00", "https://x.gr/a?utm=1"),
        ]);

        let inventory = inventory(&probe, &reader);
        assert_eq!(inventory.current().len(), 1);
    }

    #[test]
    fn search_by_source_filters_after_matching() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![
            listing_row("Booster Box", "140,00", "https://www.skroutz.gr/a"),
            listing_row("Booster Box Alt", "150,00", "https://www.bestprice.gr/b"),
        ]);

        let inventory = inventory(&probe, &reader);
        let hits = inventory.search_by_source("booster", SortOrder::default(), ProductSource::BestPrice);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Booster Box Alt");
    }

    #[test]
    fn suggestions_are_distinct_and_capped() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![
            listing_row("Booster Box", "140,00", "https://x.gr/a"),
            listing_row("booster  box™", "150,00", "https://x.gr/b"),
            listing_row("Booster Bundle", "30,00", "https://x.gr/c"),
            listing_row("Booster Pack", "5,00", "https://x.gr/d"),
        ]);

        let inventory = inventory(&probe, &reader);
        let suggestions = inventory.suggest_titles("booster", 2);
        assert_eq!(suggestions, vec!["Booster Box", "Booster Bundle"]);
    }

    #[test]
    fn suggestions_match_tokens_in_any_order() {
        let probe = FakeProbe::default();
        let reader = FakeReader::default();
        probe.set("products/latest.csv", 100);
        reader.set_rows(vec![
            listing_row("Scarlet Violet Booster Box", "140,00", "https://x.gr/a"),
            listing_row("Booster Bundle", "30,00", "https://x.gr/b"),
        ]);

        let inventory = inventory(&probe, &reader);
        assert_eq!(
            inventory.suggest_titles("box booster", 5),
            vec!["Scarlet Violet Booster Box"]
        );
    }
}
