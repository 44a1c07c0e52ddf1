//! Platform types and members the resolver knows without a classpath.

/// Simple names visible without an import.
pub(super) const JAVA_LANG: &[&str] = &[
    "Boolean",
    "Byte",
    "Character",
    "Class",
    "Double",
    "Error",
    "Exception",
    "Float",
    "IllegalArgumentException",
    "IllegalStateException",
    "Integer",
    "Iterable",
    "Long",
    "Math",
    "Number",
    "Object",
    "Runnable",
    "RuntimeException",
    "Short",
    "String",
    "StringBuilder",
    "System",
    "Thread",
    "Throwable",
    "Void",
];

/// Return type of a well-known method, by declaring type and name.
pub(super) fn method_return(declaring: &str, name: &str) -> Option<&'static str> {
    let ty = match (declaring, name) {
        ("java.lang.Integer", "valueOf") => "java.lang.Integer",
        ("java.lang.Integer", "parseInt") => "int",
        ("java.lang.Long", "valueOf") => "java.lang.Long",
        ("java.lang.Long", "parseLong") => "long",
        ("java.lang.Short", "valueOf") => "java.lang.Short",
        ("java.lang.Short", "parseShort") => "short",
        ("java.lang.Byte", "valueOf") => "java.lang.Byte",
        ("java.lang.Byte", "parseByte") => "byte",
        ("java.lang.Float", "valueOf") => "java.lang.Float",
        ("java.lang.Float", "parseFloat") => "float",
        ("java.lang.Double", "valueOf") => "java.lang.Double",
        ("java.lang.Double", "parseDouble") => "double",
        ("java.lang.Boolean", "valueOf") => "java.lang.Boolean",
        ("java.lang.Boolean", "parseBoolean") => "boolean",
        ("java.lang.Character", "valueOf") => "java.lang.Character",
        ("java.lang.Math", _) => "double",
        ("android.util.FloatMath", _) => "float",
        ("android.database.sqlite.SQLiteDatabase", "query" | "rawQuery")
        | ("android.content.ContentProvider", "query")
        | ("android.content.ContentResolver", "query")
        | ("android.content.ContentProviderClient", "query") => "android.database.Cursor",
        (
            "android.content.Context" | "android.content.res.Resources" | "android.content.res.Resources.Theme",
            "obtainStyledAttributes" | "obtainAttributes",
        ) => "android.content.res.TypedArray",
        ("android.view.VelocityTracker", "obtain") => "android.view.VelocityTracker",
        ("android.os.PowerManager", "newWakeLock") => "android.os.PowerManager.WakeLock",
        ("android.view.LayoutInflater", "from") => "android.view.LayoutInflater",
        ("android.view.LayoutInflater", "inflate") | ("android.view.View", "findViewById") => {
            "android.view.View"
        }
        ("android.view.View", "getTag") => "java.lang.Object",
        ("android.database.Cursor", "moveToNext" | "moveToFirst" | "isClosed") => "boolean",
        ("android.database.Cursor", "getInt" | "getCount" | "getColumnIndex") => "int",
        ("android.database.Cursor", "getString") => "java.lang.String",
        ("java.lang.String" | "java.lang.Object" | "java.lang.StringBuilder", "toString") => {
            "java.lang.String"
        }
        ("java.lang.String", "length") => "int",
        _ => return None,
    };
    Some(ty)
}

/// Type of a well-known static field.
pub(super) fn static_field(declaring: &str, name: &str) -> Option<&'static str> {
    let ty = match (declaring, name) {
        ("java.lang.Boolean", "TRUE" | "FALSE") => "java.lang.Boolean",
        ("java.lang.Integer", "MAX_VALUE" | "MIN_VALUE") => "int",
        ("java.lang.Long", "MAX_VALUE" | "MIN_VALUE") => "long",
        ("java.lang.Float", "MAX_VALUE" | "MIN_VALUE") => "float",
        ("java.lang.Double", "MAX_VALUE" | "MIN_VALUE") => "double",
        ("java.lang.Math", "PI" | "E") => "double",
        _ => return None,
    };
    Some(ty)
}

/// Primitive counterpart of a box type.
pub fn unboxed(ty: &str) -> Option<&'static str> {
    let prim = match ty {
        "java.lang.Integer" => "int",
        "java.lang.Long" => "long",
        "java.lang.Short" => "short",
        "java.lang.Byte" => "byte",
        "java.lang.Float" => "float",
        "java.lang.Double" => "double",
        "java.lang.Boolean" => "boolean",
        "java.lang.Character" => "char",
        _ => return None,
    };
    Some(prim)
}

/// Box type of a primitive.
pub fn boxed(ty: &str) -> Option<&'static str> {
    let boxed = match ty {
        "int" => "java.lang.Integer",
        "long" => "java.lang.Long",
        "short" => "java.lang.Short",
        "byte" => "java.lang.Byte",
        "float" => "java.lang.Float",
        "double" => "java.lang.Double",
        "boolean" => "java.lang.Boolean",
        "char" => "java.lang.Character",
        _ => return None,
    };
    Some(boxed)
}

pub fn is_primitive(ty: &str) -> bool {
    boxed(ty).is_some()
}

/// Binary numeric promotion of two operand types.
pub(super) fn promote(lhs: &str, rhs: &str) -> Option<&'static str> {
    fn rank(ty: &str) -> Option<u8> {
        let ty = unboxed(ty).unwrap_or(ty);
        match ty {
            "byte" | "short" | "char" | "int" => Some(1),
            "long" => Some(2),
            "float" => Some(3),
            "double" => Some(4),
            _ => None,
        }
    }
    let rank = rank(lhs)?.max(rank(rhs)?);
    Some(match rank {
        1 => "int",
        2 => "long",
        3 => "float",
        _ => "double",
    })
}
