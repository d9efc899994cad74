// Domain-layer modules and shared errors/models
pub mod cpf {
    pub use crate::cpf::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod queue {
    pub use crate::queue::*;
}

pub mod services {
    pub use crate::services::*;
}

pub mod errors {
    pub use crate::errors::*;
}
