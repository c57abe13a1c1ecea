pub use sea_orm_migration::prelude::*;

mod m20240509_163351_users;
mod m20240517_171303_events;
mod m20240517_171943_event_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240509_163351_users::Migration),
            Box::new(m20240517_171303_events::Migration),
            Box::new(m20240517_171943_event_users::Migration),
        ]
    }
}
