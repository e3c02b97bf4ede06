//! Text format for mazes and caves
//!
//! ```text
//! rows cols
//! <rows lines of cols tokens, each 0 or 1>   vertical walls / live cells
//!
//! <rows lines of cols tokens, each 0 or 1>   horizontal walls (mazes only)
//!
//! ```
//!
//! Blank lines before the header and between matrix rows are skipped.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::grid::{Grid, MAX_SIZE};

/// Which matrices a file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Vertical then horizontal wall matrix
    Maze,
    /// A single matrix of live cells
    Cave,
}

/// Numbered line source that skips blank lines
struct Lines<R> {
    inner: std::io::Lines<R>,
    number: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Lines {
            inner: reader.lines(),
            number: 0,
        }
    }

    /// Next non-blank line, or `UnexpectedEof` naming what was expected
    fn next_content(&mut self, expected: impl FnOnce() -> String) -> Result<String> {
        for line in self.inner.by_ref() {
            self.number += 1;
            let line = line.map_err(|e| Error::io("read maze data", e))?;
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
        Err(Error::UnexpectedEof {
            expected: expected(),
        })
    }
}

fn parse_header(line: &str, number: usize) -> Result<(usize, usize)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(Error::parse(
            number,
            format!("expected header 'rows cols', found '{}'", line.trim()),
        ));
    }
    let parse = |token: &str| {
        token
            .parse::<i64>()
            .map_err(|_| Error::parse(number, format!("dimension '{}' is not an integer", token)))
    };
    let (rows, cols) = (parse(tokens[0])?, parse(tokens[1])?);
    let max = MAX_SIZE as i64;
    if !(1..=max).contains(&rows) || !(1..=max).contains(&cols) {
        return Err(Error::InvalidDimensions { rows, cols });
    }
    Ok((rows as usize, cols as usize))
}

fn read_matrix<R: BufRead>(lines: &mut Lines<R>, rows: usize, cols: usize, name: &str) -> Result<Vec<u64>> {
    let mut matrix = Vec::with_capacity(rows);
    for row in 0..rows {
        let line = lines.next_content(|| format!("row {} of {}", row + 1, name))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != cols {
            return Err(Error::parse(
                lines.number,
                format!("expected {} values in {}, found {}", cols, name, tokens.len()),
            ));
        }
        let mut word = 0u64;
        for (col, token) in tokens.iter().enumerate() {
            match *token {
                "1" => Grid::set_bit1(&mut word, col),
                "0" => {}
                other => {
                    return Err(Error::parse(
                        lines.number,
                        format!("'{}' is not 0 or 1", other),
                    ))
                }
            }
        }
        matrix.push(word);
    }
    Ok(matrix)
}

/// Parse a grid from text
pub fn load<R: BufRead>(reader: R, layout: Layout) -> Result<Grid> {
    let mut lines = Lines::new(reader);
    let header = lines.next_content(|| "header".to_string())?;
    let (rows, cols) = parse_header(&header, lines.number)?;

    let mut grid = Grid::new(rows, cols)?;
    let verticals = read_matrix(&mut lines, rows, cols, "vertical walls")?;
    grid.set_verticals(verticals)?;
    if layout == Layout::Maze {
        let horizontals = read_matrix(&mut lines, rows, cols, "horizontal walls")?;
        grid.set_horizontals(horizontals)?;
    }
    Ok(grid)
}

/// Parse into `grid`, replacing it only when the whole input is valid
pub fn load_into<R: BufRead>(grid: &mut Grid, reader: R, layout: Layout) -> Result<()> {
    let loaded = load(reader, layout)?;
    *grid = loaded;
    Ok(())
}

pub fn load_str(text: &str, layout: Layout) -> Result<Grid> {
    load(text.as_bytes(), layout)
}

fn write_matrix<W: Write>(writer: &mut W, matrix: &[u64], cols: usize) -> std::io::Result<()> {
    for &word in matrix {
        let tokens: Vec<String> = (0..cols)
            .map(|col| Grid::get_bit(word, col).to_string())
            .collect();
        writeln!(writer, "{}", tokens.join(" "))?;
    }
    writeln!(writer)
}

/// Write a grid in the text format
pub fn save<W: Write>(grid: &Grid, mut writer: W, layout: Layout) -> Result<()> {
    let write_all = |writer: &mut W| -> std::io::Result<()> {
        writeln!(writer, "{} {}", grid.rows(), grid.cols())?;
        write_matrix(writer, grid.verticals(), grid.cols())?;
        if layout == Layout::Maze {
            write_matrix(writer, grid.horizontals(), grid.cols())?;
        }
        writer.flush()
    };
    write_all(&mut writer).map_err(|e| Error::io("write maze data", e))
}

pub fn to_string(grid: &Grid, layout: Layout) -> Result<String> {
    let mut buffer = Vec::new();
    save(grid, &mut buffer, layout)?;
    String::from_utf8(buffer).map_err(|e| Error::InvalidConfiguration {
        message: e.to_string(),
    })
}

/// Load from a file path
pub fn load_file(path: impl AsRef<Path>, layout: Layout) -> Result<Grid> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(format!("open {}", path.display()), e))?;
    load(BufReader::new(file), layout)
}

/// Save to a file path, adding a `.txt` extension when the path has none.
///
/// Returns the path actually written.
pub fn save_file(grid: &Grid, path: impl AsRef<Path>, layout: Layout) -> Result<PathBuf> {
    let mut path = path.as_ref().to_path_buf();
    if path.extension().is_none() {
        path.set_extension("txt");
    }
    let text = to_string(grid, layout)?;
    fs::write(&path, text).map_err(|e| Error::io(format!("write {}", path.display()), e))?;
    Ok(path)
}
