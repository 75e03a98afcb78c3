//! Database connection management, entities, repositories and migrations.

mod base;
mod connections;
pub mod entity;
pub mod migrator;
mod repos;

pub use base::SeaOrmBaseRepository;
pub use connections::{DatabaseConfig, DatabaseHandle};
pub use migrator::Migrator;
pub use repos::{
    SeaOrmCommentRepository, SeaOrmFollowRepository, SeaOrmGroupRepository,
    SeaOrmPostRepository, SeaOrmUserRepository,
};
