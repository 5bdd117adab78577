mod dashboard_vm;
mod overlay_vm;

pub use dashboard_vm::{
    CampaignRowVm, DashboardVm, KpiVm, RetentionAlertVm, Trend, load_dashboard,
};
pub use overlay_vm::{OverlayVm, px};
