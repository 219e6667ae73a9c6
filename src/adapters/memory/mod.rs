//! Customer memory adapters.

mod file_customer_memory;
mod in_memory_customer_memory;

pub use file_customer_memory::FileCustomerMemory;
pub use in_memory_customer_memory::InMemoryCustomerMemory;
