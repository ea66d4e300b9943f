//! # HMI Types Crate
//!
//! Wire types shared by all components attached to the head-unit middleware
//! bus.
//!
//! ## Design Principles
//!
//! - **One envelope format**: every frame on the bus is a JSON-RPC 2.0
//!   request, response, error reply or notification.
//! - **Correlation by id**: responses and error replies carry the id of the
//!   request they answer; notifications never carry an id.
//! - **Shared result codes**: every reply reports its outcome with a
//!   [`ResultCode`] drawn from the common HMI enumeration.

pub mod component;
pub mod errors;
pub mod jsonrpc;
pub mod result_code;

pub use component::BusComponent;
pub use errors::TypesError;
pub use jsonrpc::{
    InboundFrame, OutboundFrame, RpcErrorObject, RpcErrorReply, RpcId, RpcNotification,
    RpcRequest, RpcResponse, JSONRPC_VERSION,
};
pub use result_code::ResultCode;
