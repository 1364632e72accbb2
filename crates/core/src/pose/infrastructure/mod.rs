pub mod execution_provider;
pub mod model_config;
pub mod onnx_topdown_estimator;
pub mod topdown_codec;
