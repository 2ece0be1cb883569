use mongodb::Database;
use realty_config::Settings;
use realty_services::{
    AuthService,
    dao::{
        category::CategoryDao, city::CityDao, invitation::InvitationDao, listing::ListingDao,
        user::UserDao,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub listings: Arc<ListingDao>,
    pub categories: Arc<CategoryDao>,
    pub cities: Arc<CityDao>,
    pub invitations: Arc<InvitationDao>,
}

impl AppState {
    pub fn new(db: &Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(db));
        let listings = Arc::new(ListingDao::new(db));
        let categories = Arc::new(CategoryDao::new(db));
        let cities = Arc::new(CityDao::new(db));
        let invitations = Arc::new(InvitationDao::new(db));

        Self {
            settings,
            auth,
            users,
            listings,
            categories,
            cities,
            invitations,
        }
    }
}
