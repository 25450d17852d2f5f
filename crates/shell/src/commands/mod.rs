//! The subcommands of the CLI.

pub mod evaluate;
pub mod pairwise;

use std::path::PathBuf;

use clap::Subcommand;

/// The subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute MMD, coverage and 1-NN accuracy of generated clouds against
    /// reference clouds.
    Evaluate {
        /// The path to the reference clouds, an `n x P x 3` npy array.
        #[arg(short('r'), long)]
        ref_path: PathBuf,

        /// The path to the generated clouds, an `n x P x 3` npy array.
        #[arg(short('g'), long)]
        gen_path: PathBuf,

        /// The shape category, `car` or `chair`.
        #[arg(short('c'), long, default_value = "chair")]
        category: String,

        /// The method that generated the clouds, `pointflow` or `ours`.
        #[arg(short('m'), long, default_value = "ours")]
        method: String,

        /// The number of neighbors voting in the 1-NN test.
        #[arg(short('k'), long, default_value_t = 1)]
        k: usize,

        /// Whether the 1-NN test uses the square roots of the distances.
        #[arg(long, default_value_t = false)]
        sqrt: bool,

        /// Whether to also report the mean distance between the `i`-th
        /// generated and the `i`-th reference cloud.
        #[arg(long, default_value_t = false)]
        paired: bool,

        /// Where to write the report as JSON.
        #[arg(short('o'), long)]
        out_path: Option<PathBuf>,
    },
    /// Compute the distance matrices between two sets of clouds and save them
    /// as npy files.
    Pairwise {
        /// The path to the first set of clouds, an `n x P x 3` npy array.
        #[arg(short('i'), long)]
        inp_path: PathBuf,

        /// The path to the second set of clouds. The first set is compared
        /// against itself when omitted.
        #[arg(short('j'), long)]
        other_path: Option<PathBuf>,

        /// The directory for `chamfer.npy` and, with `--emd`, `emd.npy`.
        #[arg(short('o'), long)]
        out_dir: PathBuf,
    },
}
