use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use tracing::{debug, info};

use crate::{error::StorageError, graph::Graph, network::NetworkSource, stopwatch::Stopwatch};

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, StorageError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

pub(crate) fn write_bytes(bytes: &[u8], path: &Path) -> Result<(), StorageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Parses a network source (nodes, links and roads) from a JSON file.
pub fn read_network_json<P: AsRef<Path>>(path: P) -> Result<NetworkSource, StorageError> {
    let path = path.as_ref();
    let bytes = read_bytes(path)?;
    let source: NetworkSource = serde_json::from_slice(&bytes)?;

    info!(
        path = %path.display(),
        nodes = source.nodes.len(),
        links = source.links.len(),
        roads = source.roads.len(),
        "Read network source"
    );
    Ok(source)
}

impl Graph {
    /// Loads a graph straight from a JSON network source.
    pub fn from_network_json<P: AsRef<Path>>(path: P) -> Result<Graph, StorageError> {
        let source = read_network_json(path)?;
        Ok(Graph::load(&source)?)
    }

    /// Writes a binary snapshot of the compiled graph.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        let stopwatch = Stopwatch::new("graph/save");
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        write_bytes(&bytes, path.as_ref())?;

        info!(path = %path.as_ref().display(), size = bytes.len(), "Saved graph");
        stopwatch.report();
        Ok(())
    }

    /// Reads a snapshot written by [`Graph::save_to_file`].
    ///
    /// The loaded graph gets a new identity, results prepared for the graph
    /// that was saved must be prepared again. A snapshot whose topology or
    /// attribute columns are inconsistent fails with [`StorageError::Load`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Graph, StorageError> {
        let stopwatch = Stopwatch::new("graph/from_file");
        let path = path.as_ref();

        debug!("Reading from path {}", path.display());
        let bytes = read_bytes(path)?;
        debug!("Read from path {}, size {}", path.display(), bytes.len());

        let (graph, _): (Graph, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
        graph.validate()?;

        info!(
            nodes = graph.node_count(),
            links = graph.link_count(),
            "Deserialized graph from buffer"
        );
        stopwatch.report();
        Ok(graph)
    }
}
