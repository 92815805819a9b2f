//! Infrastructure layer - database, migrations and the Unit of Work.

mod db;
pub mod migrations;
pub mod unit_of_work;

pub use db::Database;
pub use migrations::Migrator;
pub use unit_of_work::{
    Persistence, TransactionContext, TxFuture, TxPaymentRepository, TxProfileRepository,
    UnitOfWork,
};
