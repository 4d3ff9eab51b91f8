//! Built-in experiment defaults
//!
//! The default tree for octree-network training runs. Every key an
//! experiment document or override may touch is declared here.

use crate::error::Result;
use crate::tree::ConfigNode;

use super::builder::SchemaBuilder;

/// Data pipeline settings shared by the `train` and `test` splits.
fn data_split() -> Result<ConfigNode> {
    SchemaBuilder::new()
        .str("name", "") // dataset name
        .int("depth", 5) // octree depth
        .int("full_depth", 2)
        .bool("node_dis", false) // save the node displacement
        .bool("split_label", false)
        .bool("adaptive", false) // build the adaptive octree
        .bool("node_feat", false)
        .bool("distort", false) // data augmentation
        .float("offset", 0.016) // displacement applied to points
        .float("scale", 0.0)
        .bool("uniform", false) // uniform scales
        .float("jitter", 0.0)
        .str("normal_axis", "") // re-orients normal directions
        .int_tuple("interval", &[1, 1, 1]) // with `angle`, generates random rotations
        .int_tuple("angle", &[180, 180, 180])
        .str("location", "")
        .str("filelist", "")
        .int("batch_size", 32)
        .int("num_workers", 8)
        .build()
}

/// Build the default schema.
///
/// `DATA.test` starts as a deep copy of `DATA.train`; the two splits are
/// independent afterwards.
pub fn default_schema() -> Result<ConfigNode> {
    let train = data_split()?;

    SchemaBuilder::new()
        .node("SOLVER", |b| {
            b.str("alias", "time") // experiment alias, `time` expands to a timestamp
                .int_tuple("gpu", &[0])
                .str("logdir", "logs")
                .str("ckpt", "") // restore weights from this checkpoint
                .str("run", "train") // train or test
                .str("type", "sgd") // sgd or adam
                .int("max_epoch", 300)
                .int("test_every_epoch", 10)
                .str("lr_type", "step") // step or cos
                .float("lr", 0.1)
                .float("gamma", 0.1) // step-wise decay
                .int_tuple("step_size", &[120, 60])
                .int("ckpt_num", 10) // checkpoints kept
                .str("dist_url", "tcp://localhost:10001")
                .bool("verbose", false)
        })
        .node("DATA", |b| b.subtree("train", train.clone()).subtree("test", train))
        .node("MODEL", |b| {
            b.str("name", "")
                .int("depth", 5) // input octree depth
                .int("depth_out", 5) // output feature depth
                .int("channel", 3)
                .int("factor", 1) // network width multiplier
                .int("nout", 40)
                .int("resblock_num", 3)
                .int("bottleneck", 4)
                .float_tuple("dropout", &[0.0])
                .str("upsample", "nearest")
                .bool("nempty", false)
        })
        .node("LOSS", |b| {
            b.int("num_class", 40)
                .float("weight_decay", 0.0005)
                .float_tuple("weights", &[1.0, 1.0])
                .float("label_smoothing", 0.0)
        })
        .node("SYS", |b| b.str("cmds", "")) // invocation backup
        .build()
}
