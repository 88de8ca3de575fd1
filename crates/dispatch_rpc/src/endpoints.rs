//! Reference bind addresses and route paths. Every address can be
//! overridden through `dispatchd` flags or environment variables.

use std::net::SocketAddr;

pub const DEFAULT_MATCHING_ADDR: &str = "127.0.0.1:50051";
pub const DEFAULT_TRIP_REQUEST_ADDR: &str = "127.0.0.1:50052";
pub const DEFAULT_TRIP_ADDR: &str = "127.0.0.1:50053";
pub const DEFAULT_DRIVER_STATUS_ADDR: &str = "127.0.0.1:50054";
pub const DEFAULT_PRICING_ADDR: &str = "127.0.0.1:50056";
pub const DEFAULT_WORKFLOW_ADDR: &str = "127.0.0.1:50057";

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

/// One route per operation.
pub mod paths {
    pub const HEALTH: &str = "/health";

    pub const CREATE_TRIP_REQUEST: &str = "/create_trip_request";
    pub const CANCEL_TRIP_REQUEST: &str = "/cancel_trip_request";
    pub const GET_TRIP_REQUEST: &str = "/get_trip_request";
    pub const MARK_FULFILLED: &str = "/mark_fulfilled";

    pub const GET_CANDIDATES: &str = "/get_candidates";

    pub const CALCULATE_PRICE: &str = "/calculate_price";
    pub const GET_FALLBACK_CONFIG: &str = "/get_fallback_config";
    pub const UPDATE_FALLBACK_CONFIG: &str = "/update_fallback_config";

    pub const UPDATE_DRIVER_STATUS: &str = "/update_driver_status";
    pub const GET_DRIVER_STATUS: &str = "/get_driver_status";
    pub const REGISTER_DRIVER: &str = "/register_driver";

    pub const CREATE_TRIP: &str = "/create_trip";
    pub const UPDATE_TRIP_STATUS: &str = "/update_trip_status";
    pub const CANCEL_TRIP: &str = "/cancel_trip";
    pub const GET_TRIP_BY_ID: &str = "/get_trip_by_id";
    pub const GET_TRIP_BY_REQUEST_ID: &str = "/get_trip_by_request_id";
}
