use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::common::OBJECT_REF_SIZE;

use super::DataType;

/// Represents a single column in a tuple schema, with its position in the
/// tuple layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    name: String,

    /// Column data type
    data_type: DataType,

    /// Whether the column allows NULL values
    nullable: bool,

    /// Byte offset of the slot, relative to the end of the tuple header
    offset: usize,

    /// Width of the slot in bytes
    length: usize,

    /// Whether the value bytes live in the slot itself
    inlined: bool,
}

impl Column {
    /// Creates a new column definition. Layout is assigned by Schema.
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            offset: 0,
            length: 0,
            inlined: true,
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column data type.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Returns whether the column allows NULL values.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the slot offset, not counting the tuple header.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the slot width in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns true if the value is stored in the slot rather than out of line.
    pub fn is_inlined(&self) -> bool {
        self.inlined
    }

    fn same_layout(&self, other: &Column) -> bool {
        self.data_type == other.data_type
            && self.offset == other.offset
            && self.length == other.length
            && self.inlined == other.inlined
    }
}

/// Represents the layout of a tuple: column types, slot offsets and widths,
/// and which columns keep their values out of line.
///
/// Columns are packed in declaration order. A variable-length column is
/// inlined only when the schema allows inlined objects and its declared
/// length is below `UNINLINEABLE_OBJECT_LENGTH`; an inlined slot holds a
/// length byte followed by the value, an out-of-line slot holds an
/// `ObjectRef`.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Ordered list of columns
    columns: Vec<Column>,

    /// Map from column name to column index for fast lookup
    name_to_index: HashMap<String, usize>,

    /// Indexes of the columns stored out of line
    uninlined_columns: Vec<usize>,

    /// Sum of all slot widths
    row_length: usize,

    /// Whether variable-length columns may be stored inline
    allow_inlined_objects: bool,
}

impl Schema {
    /// Creates a new schema from a list of columns.
    pub fn new(columns: Vec<Column>, allow_inlined_objects: bool) -> Self {
        let mut columns = columns;
        let mut name_to_index = HashMap::new();
        let mut uninlined_columns = Vec::new();
        let mut offset = 0;

        for (i, col) in columns.iter_mut().enumerate() {
            name_to_index.insert(col.name.clone(), i);

            let ty = col.data_type;
            col.inlined = !ty.is_variable_length() || (allow_inlined_objects && ty.is_inlinable());
            col.length = match (ty.fixed_size(), ty.max_length()) {
                (Some(size), _) => size,
                (None, Some(n)) if col.inlined => n + 1,
                _ => OBJECT_REF_SIZE,
            };
            col.offset = offset;
            offset += col.length;

            if !col.inlined {
                uninlined_columns.push(i);
            }
        }

        Self {
            columns,
            name_to_index,
            uninlined_columns,
            row_length: offset,
            allow_inlined_objects,
        }
    }

    /// Creates a schema builder for fluent construction.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Returns the number of columns in the schema.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column at the given index.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns the column with the given name.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.name_to_index
            .get(name)
            .and_then(|&i| self.columns.get(i))
    }

    /// Returns the index of the column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Returns an iterator over all columns.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the tuple length in bytes, excluding the header.
    pub fn row_length(&self) -> usize {
        self.row_length
    }

    /// Returns whether variable-length columns may be stored inline.
    pub fn allow_inlined_objects(&self) -> bool {
        self.allow_inlined_objects
    }

    /// Returns the number of columns stored out of line.
    pub fn uninlined_object_column_count(&self) -> usize {
        self.uninlined_columns.len()
    }

    /// Returns the column index of the `i`th out-of-line column.
    pub fn uninlined_object_column(&self, i: usize) -> Option<usize> {
        self.uninlined_columns.get(i).copied()
    }

    /// Returns the column indexes of all out-of-line columns.
    pub fn uninlined_object_columns(&self) -> &[usize] {
        &self.uninlined_columns
    }
}

/// Schemas are equal when their tuple layouts match: the inline policy and,
/// per column, the type, offset, width and inline flag. Names and
/// nullability do not take part.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.allow_inlined_objects == other.allow_inlined_objects
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.same_layout(b))
    }
}

impl Eq for Schema {}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Schema(columns={}, row_length={}, inlined_objects={})",
            self.columns.len(),
            self.row_length,
            self.allow_inlined_objects
        )?;
        for (i, col) in self.columns.iter().enumerate() {
            write!(
                f,
                "\n  [{}] {} {} offset={} length={}{}",
                i,
                col.name,
                col.data_type,
                col.offset,
                col.length,
                if col.inlined { "" } else { " out-of-line" }
            )?;
        }
        Ok(())
    }
}

/// Builder for constructing schemas fluently.
pub struct SchemaBuilder {
    columns: Vec<Column>,
    allow_inlined_objects: bool,
}

impl SchemaBuilder {
    /// Creates a new schema builder. Inlined objects are allowed by default.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            allow_inlined_objects: true,
        }
    }

    /// Adds a non-nullable column.
    pub fn column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(Column::new(name, data_type, false));
        self
    }

    /// Adds a nullable column.
    pub fn nullable_column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(Column::new(name, data_type, true));
        self
    }

    /// Sets whether short variable-length columns are stored inline.
    pub fn allow_inlined_objects(mut self, allow: bool) -> Self {
        self.allow_inlined_objects = allow;
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Schema {
        Schema::new(self.columns, self.allow_inlined_objects)
    }

    /// Builds the schema wrapped in an Arc for shared ownership.
    pub fn build_arc(self) -> Arc<Schema> {
        Arc::new(self.build())
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
