pub mod stage1_encode;
pub mod stage2_predict;
pub mod stage3_classify;
pub mod stage4_report;
