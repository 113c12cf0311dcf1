use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::{CodedIndexType, TableId},
    Error::OutOfBounds,
    Result,
};

/// Holds information about the size that reference index fields have
#[derive(Clone, Copy, Default, PartialEq, Debug)]
struct TableRowInfo {
    /// The count of rows in this table
    rows: u32,
    /// Number of bits required to represent any valid row index
    bits: u8,
}

impl TableRowInfo {
    fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            // 32 - leading_zeros is at most 32
            u8::try_from(32 - rows.leading_zeros()).unwrap_or(32)
        };

        Self { rows, bits }
    }
}

/// Row counts and index widths of the tables stream.
///
/// Parsed from the tables stream header (ECMA-335 II.24.2.6): reserved `u32`, major and
/// minor version, the heap-size flags, a reserved byte, the `valid` and `sorted` masks, and
/// one `u32` row count per bit set in `valid`. Tables data follows immediately after.
#[derive(Clone, Debug)]
pub struct TableInfo {
    rows: [TableRowInfo; TableId::COUNT],
    coded_indexes: [u8; CodedIndexType::COUNT],
    valid: u64,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
    tables_offset: usize,
}

impl TableInfo {
    /// Parse the tables stream header.
    ///
    /// ## Arguments
    /// * 'data' - The complete `#~` (or `#-`) stream
    ///
    /// # Errors
    /// Returns an error if the header or the row count array is truncated
    pub fn read(data: &[u8]) -> Result<Self> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let heap_size_flags = read_le::<u8>(&data[6..])?;
        let valid = read_le::<u64>(&data[8..])?;

        let mut rows = [TableRowInfo::default(); TableId::COUNT];
        let mut next_row_offset = 24;
        for bit in 0..64_usize {
            if (valid & (1 << bit)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if let Some(slot) = rows.get_mut(bit) {
                *slot = TableRowInfo::new(row_count);
            }
        }

        // Undocumented flag: 4 additional bytes follow the row counts
        if heap_size_flags & 0x40 == 0x40 {
            next_row_offset += 4;
        }

        if next_row_offset > data.len() {
            return Err(OutOfBounds);
        }

        let mut table_info = TableInfo {
            rows,
            coded_indexes: [0; CodedIndexType::COUNT],
            valid,
            is_large_index_str: heap_size_flags & 1 == 1,
            is_large_index_guid: heap_size_flags & 2 == 2,
            is_large_index_blob: heap_size_flags & 4 == 4,
            tables_offset: next_row_offset,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    #[cfg(test)]
    /// Special constructor for unit-tests
    ///
    /// ## Arguments
    /// * 'valid_tables'    - A slice of touples, which provides (table_id, row_count) of the valid tables
    /// * 'large_str'       - Specify if the #String heap indexes are 4 or 2 bytes
    /// * 'large_blob'      - Specify if the #Blob heap indexes are 4 or 2 bytes
    /// * 'large_guid'      - Specify if the #GUID heap indexes are 4 or 2 bytes
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: [TableRowInfo::default(); TableId::COUNT],
            coded_indexes: [0; CodedIndexType::COUNT],
            valid: 0,
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
            tables_offset: 0,
        };

        for (table, rows) in valid_tables {
            table_info.valid |= 1 << (*table as u8);
            table_info.rows[*table as usize] = TableRowInfo::new(*rows);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Offset of the first table row, relative to the start of the stream.
    #[must_use]
    pub fn tables_offset(&self) -> usize {
        self.tables_offset
    }

    /// Returns `true` if the table is flagged in the `valid` mask.
    #[must_use]
    pub fn is_present(&self, id: TableId) -> bool {
        self.valid & (1 << (id as u8)) != 0
    }

    /// Number of rows of a table, 0 if absent.
    #[must_use]
    pub fn rows(&self, id: TableId) -> u32 {
        self.rows[id as usize].rows
    }

    /// Indicates the size of indexes referring into the '#String' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Indicates the size of indexes referring into the '#Blob' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    fn str_bytes(&self) -> u32 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    fn guid_bytes(&self) -> u32 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    fn blob_bytes(&self) -> u32 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    fn index_bytes(&self, table_id: TableId) -> u32 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    fn coded_bytes(&self, coded_index_type: CodedIndexType) -> u32 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let max_bits = coded_index
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index as usize] = max_bits + coded_index.tag_bits();
        }
    }

    /// Byte size of one row of a table that precedes `Assembly`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] for `Assembly` and later tables; the reader
    /// never needs to skip over them.
    #[rustfmt::skip]
    pub fn row_size(&self, id: TableId) -> Result<u32> {
        let s = self.str_bytes();
        let g = self.guid_bytes();
        let b = self.blob_bytes();
        let idx = |table| self.index_bytes(table);
        let ci = |coded| self.coded_bytes(coded);

        let size = match id {
            TableId::Module          => 2 + s + g + g + g,
            TableId::TypeRef         => ci(CodedIndexType::ResolutionScope) + s + s,
            TableId::TypeDef         => 4 + s + s + ci(CodedIndexType::TypeDefOrRef)
                                          + idx(TableId::Field) + idx(TableId::MethodDef),
            TableId::FieldPtr        => idx(TableId::Field),
            TableId::Field           => 2 + s + b,
            TableId::MethodPtr       => idx(TableId::MethodDef),
            TableId::MethodDef       => 4 + 2 + 2 + s + b + idx(TableId::Param),
            TableId::ParamPtr        => idx(TableId::Param),
            TableId::Param           => 2 + 2 + s,
            TableId::InterfaceImpl   => idx(TableId::TypeDef) + ci(CodedIndexType::TypeDefOrRef),
            TableId::MemberRef       => ci(CodedIndexType::MemberRefParent) + s + b,
            TableId::Constant        => 1 + 1 + ci(CodedIndexType::HasConstant) + b,
            TableId::CustomAttribute => ci(CodedIndexType::HasCustomAttribute)
                                          + ci(CodedIndexType::CustomAttributeType) + b,
            TableId::FieldMarshal    => ci(CodedIndexType::HasFieldMarshal) + b,
            TableId::DeclSecurity    => 2 + ci(CodedIndexType::HasDeclSecurity) + b,
            TableId::ClassLayout     => 2 + 4 + idx(TableId::TypeDef),
            TableId::FieldLayout     => 4 + idx(TableId::Field),
            TableId::StandAloneSig   => b,
            TableId::EventMap        => idx(TableId::TypeDef) + idx(TableId::Event),
            TableId::EventPtr        => idx(TableId::Event),
            TableId::Event           => 2 + s + ci(CodedIndexType::TypeDefOrRef),
            TableId::PropertyMap     => idx(TableId::TypeDef) + idx(TableId::Property),
            TableId::PropertyPtr     => idx(TableId::Property),
            TableId::Property        => 2 + s + b,
            TableId::MethodSemantics => 2 + idx(TableId::MethodDef) + ci(CodedIndexType::HasSemantics),
            TableId::MethodImpl      => idx(TableId::TypeDef) + ci(CodedIndexType::MethodDefOrRef)
                                          + ci(CodedIndexType::MethodDefOrRef),
            TableId::ModuleRef       => s,
            TableId::TypeSpec        => b,
            TableId::ImplMap         => 2 + ci(CodedIndexType::MemberForwarded) + s
                                          + idx(TableId::ModuleRef),
            TableId::FieldRVA        => 4 + idx(TableId::Field),
            TableId::EncLog          => 4 + 4,
            TableId::EncMap          => 4,
            _ => return Err(crate::Error::NotSupported),
        };

        Ok(size)
    }

    /// Offset of the first row of `id`, relative to the start of the stream.
    ///
    /// # Errors
    /// Returns an error if a preceding table has an unknown layout or the sizes overflow
    pub fn table_offset(&self, id: TableId) -> Result<usize> {
        let mut offset = self.tables_offset as u64;
        for table in TableId::iter().take_while(|table| *table < id) {
            if !self.is_present(table) {
                continue;
            }

            offset += u64::from(self.rows(table)) * u64::from(self.row_size(table)?);
        }

        usize::try_from(offset).map_err(|_| malformed_error!("Table offset overflow - {}", offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted_header() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00,                         // reserved
            0x02, 0x00,                                     // major, minor
            0x05,                                           // heap sizes: large str + blob
            0x01,                                           // reserved
            0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // valid: Module | Assembly
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x01, 0x00, 0x00, 0x00,                         // Module rows
            0x01, 0x00, 0x00, 0x00,                         // Assembly rows
        ];

        let info = TableInfo::read(&data).unwrap();

        assert_eq!(info.tables_offset(), 32);
        assert!(info.is_present(TableId::Module));
        assert!(info.is_present(TableId::Assembly));
        assert!(!info.is_present(TableId::TypeDef));
        assert_eq!(info.rows(TableId::Assembly), 1);
        assert!(info.is_large_str());
        assert!(info.is_large_blob());

        // Module: 2 + 4 + 3 * 2
        assert_eq!(info.row_size(TableId::Module).unwrap(), 12);
        assert_eq!(info.table_offset(TableId::Assembly).unwrap(), 44);
    }

    #[test]
    fn crafted_truncated() {
        let mut data = vec![0u8; 24];
        data[8] = 0x03;
        data.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);

        // Two tables flagged, only one row count present
        assert!(TableInfo::read(&data).is_err());
        assert!(TableInfo::read(&data[..10]).is_err());
    }

    #[test]
    fn test_small_coded_indexes() {
        let info = TableInfo::new_test(
            &[(TableId::TypeDef, 10), (TableId::MethodDef, 20), (TableId::Field, 5)],
            false,
            false,
            false,
        );

        // 4 + 2 + 2 + 2 + 2 + 2
        assert_eq!(info.row_size(TableId::TypeDef).unwrap(), 14);
        assert_eq!(info.row_size(TableId::CustomAttribute).unwrap(), 6);
    }

    #[test]
    fn test_large_coded_indexes() {
        // 2^11 rows need 12 bits, + 5 tag bits for HasCustomAttribute > 16
        let info = TableInfo::new_test(&[(TableId::MethodDef, 0x800)], false, false, false);

        assert_eq!(info.row_size(TableId::CustomAttribute).unwrap(), 4 + 2 + 2);
        // MethodDefOrRef only has 1 tag bit
        assert_eq!(info.row_size(TableId::MethodImpl).unwrap(), 6);
        assert_eq!(info.row_size(TableId::MethodPtr).unwrap(), 2);

        let huge = TableInfo::new_test(&[(TableId::MethodDef, 0x1_0000)], true, true, true);
        assert_eq!(huge.row_size(TableId::MethodPtr).unwrap(), 4);
        assert_eq!(huge.row_size(TableId::MethodImpl).unwrap(), 2 + 4 + 4);
        assert_eq!(huge.row_size(TableId::Module).unwrap(), 2 + 4 * 4);
    }

    #[test]
    fn test_table_offset_skips_preceding_tables() {
        let info = TableInfo::new_test(
            &[(TableId::Module, 1), (TableId::TypeRef, 3), (TableId::Assembly, 1)],
            false,
            false,
            false,
        );

        // Module 10 bytes, TypeRef 6 bytes each
        assert_eq!(info.table_offset(TableId::Assembly).unwrap(), 10 + 18);
        assert!(info.row_size(TableId::Assembly).is_err());
    }
}
