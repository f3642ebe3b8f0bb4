use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcsError {
    #[error("no entity carries all of [{kinds}]")]
    SingletonMissing { kinds: String },
    #[error("expected exactly one entity with [{kinds}], found {count}")]
    SingletonAmbiguous { kinds: String, count: usize },
    #[error("entity index space exhausted after {allocated} allocations")]
    EntityIdsExhausted { allocated: u64 },
}
