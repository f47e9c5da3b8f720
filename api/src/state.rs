use std::sync::Arc;

use toolshelf_core::catalog::Catalog;
use toolshelf_core::favorites::FavoritesService;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub favorites: Arc<FavoritesService>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            favorites: Arc::new(FavoritesService::in_memory(Arc::clone(&catalog))),
            catalog,
        }
    }
}
