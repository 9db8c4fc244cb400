pub mod consts;
pub mod errors;
pub mod pool;
pub mod mapper;
pub mod options;
pub mod filter;
pub mod index;
pub mod engine;

pub use errors::{BffError, Result, VerifyError};
pub use pool::{BitVector, BitVectorPool, PooledVector};
pub use mapper::{MapperFactory, PositionMapper, Xxh64Factory, Xxh64Mapper};
pub use options::{FilterOptions, IndexConfig};
pub use filter::BloomFilter;
pub use index::{shard_ranges, AcceptAll, LookupResult, ShardedIndex, Verifier};
pub use engine::{SearchEngine, TermsExtractor};
