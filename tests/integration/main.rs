mod config_roundtrip;
mod exports;
mod orchestrator_flow;
mod poller_lifecycle;
