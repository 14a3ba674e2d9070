pub use mini_kv_db::KvStore;

mod mini_kv_db;
