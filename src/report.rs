// Read-only views of a network for display. A snapshot owns copies of every
// neuron and connection value, so whatever renders it never touches the live
// network.

use crate::engine::{ConnectionId, LayerKind, Network, NeuronId};
use crate::error::Result;
use num_traits::Float;
use std::{fmt, fs::File, io::Write, path::Path};

#[derive(Clone, Debug, PartialEq)]
pub struct NeuronSnapshot<T> {
    pub id: NeuronId,
    pub layer: LayerKind,
    pub value: T,
    pub error: T,
    pub bias_value: T,
    pub bias_weight: T,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionSnapshot<T> {
    pub id: ConnectionId,
    pub source: NeuronId,
    pub target: NeuronId,
    pub weight: T,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkSnapshot<T> {
    pub neurons: Vec<NeuronSnapshot<T>>,
    pub connections: Vec<ConnectionSnapshot<T>>,
}

impl<T> Network<T>
where
    T: Float + fmt::Display,
{
    /// Copies out every layered neuron and every connection, in
    /// `all_neurons` / `all_connections` order.
    pub fn snapshot(&self) -> Result<NetworkSnapshot<T>> {
        let mut neurons = Vec::new();
        for layer in self.layers() {
            for &id in layer.neurons() {
                let neuron = self.neuron(id)?;
                neurons.push(NeuronSnapshot {
                    id,
                    layer: layer.kind(),
                    value: neuron.value(),
                    error: neuron.error(),
                    bias_value: neuron.bias_value(),
                    bias_weight: neuron.bias_weight(),
                });
            }
        }

        let connections = self
            .all_connections()
            .into_iter()
            .map(|id| {
                self.connection(id).map(|c| ConnectionSnapshot {
                    id,
                    source: c.source,
                    target: c.target,
                    weight: c.weight,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NetworkSnapshot {
            neurons,
            connections,
        })
    }
}

impl<T> NetworkSnapshot<T>
where
    T: Float + fmt::Display,
{
    /// Renders the snapshot as a Graphviz digraph, one column per layer.
    pub fn to_dot(&self) -> String {
        let mut content = String::new();

        content.push_str("digraph {\n");
        content.push_str(r#"    rankdir="LR""#);
        content.push_str("\n    node [shape=record]\n");

        for kind in LayerKind::ALL {
            let ids: Vec<String> = self
                .neurons
                .iter()
                .filter(|n| n.layer == kind)
                .map(|n| n.id.index().to_string())
                .collect();
            if ids.is_empty() {
                continue;
            }
            content.push_str(&format!("    {{ rank=same; {} }}\n", ids.join("; ")));
        }

        for n in &self.neurons {
            content.push_str(&format!(
                r#"    {} [label="{{ {} | V: {:.4} | Er: {:.4} | Bw: {:.4} | Bv: {:.4} }}"]"#,
                n.id.index(),
                n.layer,
                n.value,
                n.error,
                n.bias_weight,
                n.bias_value
            ));
            content.push('\n');
        }

        for c in &self.connections {
            content.push_str(&format!(
                r#"    {} -> {} [label="W: {:.4}"]"#,
                c.source.index(),
                c.target.index(),
                c.weight
            ));
            content.push('\n');
        }

        content.push_str("}\n");
        content
    }

    pub fn write_dot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        file.write_all(self.to_dot().as_bytes())?;

        log::info!("wrote network graph to {}", path.display());
        Ok(())
    }
}
