//! Source tables shaped like the field-inspection spreadsheet export.

use std::path::{Path, PathBuf};

/// Header row of the spreadsheet, in its usual column order.
pub const ARABIC_HEADER: &str = "تاريخ الفحص,تاريخ المعاملة,القطاع,القطاع الفرعي,وصف الافة,تصنيف الافة,ملاحظات,المبيد 1,المبيد 2,المبيد 3,المبيد 4,المبيد 5";

/// Six rows covering a known pest, a spelling variant, a missing
/// description, an unknown pest, a bad date and the "none" misspellings.
pub const INSPECTIONS_CSV: &str = "\
تاريخ الفحص,تاريخ المعاملة,القطاع,القطاع الفرعي,وصف الافة,تصنيف الافة,ملاحظات,المبيد 1,المبيد 2,المبيد 3,المبيد 4,المبيد 5
2024-05-01,2024-05-02,7,أ,اكروس,حشرات,اصابة شديدة,ابامكتين,لايوجد,,,
2024-05-02,,7,ب,اكاروس على السعف,حشرات,اصابة متوسطة,ابامكتين,,,,
2024-05-09,,12,أ,,,,لايوج,,,,
2024-05-10,,12,ب,red scale,حشرات,خفيف,,,,,
not a date,,28,ج,دوباس,حشرات,كثيف جدا,,,,,
2024-05-20,,28,ج,سوسة النخيل الحمراء,حشرات,,امداكلوبريد,,,,
";

/// Rows in [`INSPECTIONS_CSV`].
pub const INSPECTIONS_ROWS: usize = 6;

/// A table with English headers and a surplus column.
pub const ENGLISH_CSV: &str = "\
inspection_date,sector,pest_description,notes,pesticide_1,inspector
2024-06-03,4,Dubas bug,,لا يوجد,salem
2024-06-04,4,دوباس,متوسط,,huda
";

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_table(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture table");
    path
}
