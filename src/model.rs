use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::features::{FEATURE_COUNT, FEATURE_NAMES};

/// A trained binary classifier over the derived feature vector.
pub trait SuccessModel: Send + Sync {
    fn name(&self) -> &str;

    /// Probability of the positive (catch) class for one feature vector.
    fn predict_probability(&self, features: &[f32]) -> Result<f32>;
}

#[derive(Deserialize)]
struct LogisticJson {
    feat_list: Vec<String>,
    weights: Vec<f32>,
    bias: f32,
}

/// The artifact must have been trained on exactly our input order.
fn check_feat_list(feat_list: &[String]) -> Result<()> {
    ensure!(
        feat_list.len() == FEATURE_COUNT,
        "artifact expects {} features, deriver produces {}",
        feat_list.len(),
        FEATURE_COUNT
    );
    if let Some((i, (got, want))) = feat_list
        .iter()
        .zip(FEATURE_NAMES.iter())
        .enumerate()
        .find(|(_, (got, want))| got.as_str() != **want)
    {
        bail!("feature order mismatch at {}: artifact has {:?}, expected {:?}", i, got, want);
    }
    Ok(())
}

/// Logistic regression artifact stored as JSON:
/// `{ "feat_list": [...], "weights": [...], "bias": b }`.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Vec<f32>,
    bias: f32,
}

impl LogisticModel {
    pub fn new(weights: Vec<f32>, bias: f32) -> Result<Self> {
        ensure!(
            weights.len() == FEATURE_COUNT,
            "expected {} weights, got {}",
            FEATURE_COUNT,
            weights.len()
        );
        Ok(Self { weights, bias })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("failed to read model at {}", path.display()))?;
        let art: LogisticJson = serde_json::from_str(&txt)
            .with_context(|| format!("failed to parse model {}", path.display()))?;
        check_feat_list(&art.feat_list)?;
        Self::new(art.weights, art.bias)
    }
}

impl SuccessModel for LogisticModel {
    fn name(&self) -> &str {
        "logistic"
    }

    fn predict_probability(&self, x: &[f32]) -> Result<f32> {
        if x.len() != self.weights.len() {
            bail!(
                "feature length mismatch: got {}, expected {}",
                x.len(),
                self.weights.len()
            );
        }
        let z: f32 = self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f32>() + self.bias;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

#[cfg(feature = "torch")]
pub use torch::TorchModel;

#[cfg(feature = "torch")]
mod torch {
    use super::*;
    use parking_lot::Mutex;
    use tch::{kind::Kind, CModule, Device, Tensor};

    #[derive(Deserialize)]
    struct MetaJson {
        feat_list: Vec<String>,
        in_dim: Option<usize>,
    }

    /// TorchScript classifier. Output is either `[1, 2]` class logits or a
    /// single `[1, 1]` logit.
    pub struct TorchModel {
        module: Mutex<CModule>,
        device: Device,
    }

    impl TorchModel {
        pub fn new(model_path: &Path, meta_path: Option<&Path>) -> Result<Self> {
            let device = Device::Cpu;

            if let Some(meta_path) = meta_path {
                let meta_txt = fs::read_to_string(meta_path)
                    .with_context(|| format!("failed to read meta at {}", meta_path.display()))?;
                let meta: MetaJson =
                    serde_json::from_str(&meta_txt).with_context(|| "failed to parse meta.json")?;
                check_feat_list(&meta.feat_list)?;
                if let Some(in_dim) = meta.in_dim {
                    ensure!(in_dim == FEATURE_COUNT, "meta.in_dim ({}) != {}", in_dim, FEATURE_COUNT);
                }
            }

            let module = CModule::load_on_device(model_path, device)
                .with_context(|| format!("failed to load TorchScript {}", model_path.display()))?;

            // Probe output shape with a dummy forward
            let dummy = Tensor::zeros([1, FEATURE_COUNT as i64], (Kind::Float, device));
            let sz = module.forward_ts(&[dummy])?.size();
            if sz.len() != 2 || sz[0] != 1 || !(sz[1] == 1 || sz[1] == 2) {
                bail!("unexpected model output size: {:?}", sz);
            }

            Ok(Self {
                module: Mutex::new(module),
                device,
            })
        }
    }

    impl SuccessModel for TorchModel {
        fn name(&self) -> &str {
            "torchscript"
        }

        fn predict_probability(&self, x: &[f32]) -> Result<f32> {
            if x.len() != FEATURE_COUNT {
                bail!("feature length mismatch: got {}, expected {}", x.len(), FEATURE_COUNT);
            }
            let input = Tensor::from_slice(x)
                .reshape([1, FEATURE_COUNT as i64])
                .to_device(self.device);

            let out = self.module.lock().forward_ts(&[input])?;
            let p = match out.size().as_slice() {
                [1, 2] => out.softmax(-1, Kind::Float).double_value(&[0, 1]),
                [1, 1] => out.sigmoid().double_value(&[0, 0]),
                sz => bail!("unexpected model output size: {:?}", sz),
            };
            Ok(p as f32)
        }
    }
}

/// Loads a model artifact, choosing the backend by file extension.
pub fn load_model(path: &Path) -> Result<Box<dyn SuccessModel>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => Ok(Box::new(LogisticModel::load(path)?)),
        "pt" | "ts" => load_torchscript(path),
        other => bail!("unsupported model artifact extension {:?} ({})", other, path.display()),
    }
}

#[cfg(feature = "torch")]
fn load_torchscript(path: &Path) -> Result<Box<dyn SuccessModel>> {
    let meta = path.with_extension("meta.json");
    let meta = meta.exists().then_some(meta.as_path());
    Ok(Box::new(TorchModel::new(path, meta)?))
}

#[cfg(not(feature = "torch"))]
fn load_torchscript(path: &Path) -> Result<Box<dyn SuccessModel>> {
    bail!(
        "{} is a TorchScript artifact but this build lacks the `torch` feature",
        path.display()
    )
}
