use rfx_ir::ProjectOptions;

use super::*;
use crate::test_util::{android, assert_rewrites, assert_unchanged};

#[test]
fn test_local_map_and_its_creation() {
    assert_rewrites(
        &SparseArray,
        android(),
        "package p;

import java.util.HashMap;

class Sample {
    void f() {
        HashMap<Integer, String> names = new HashMap<Integer, String>();
        names.put(1, \"one\");
    }
}
",
        "package p;

import java.util.HashMap;
import android.util.SparseArray;

class Sample {
    void f() {
        SparseArray<String> names = new SparseArray<String>();
        names.put(1, \"one\");
    }
}
",
    );
}

#[test]
fn test_private_field_with_diamond_and_specialized_values() {
    assert_rewrites(
        &SparseArray,
        android(),
        "import java.util.*;

class Sample {
    private Map<Integer, Boolean> seen = new HashMap<>();
    private HashMap<Integer, Integer> counts;

    void f(int k) {
        counts = new HashMap<Integer, Integer>();
        this.seen.put(k, true);
        counts.put(k, counts.size());
    }
}
",
        "import java.util.*;
import android.util.SparseBooleanArray;
import android.util.SparseIntArray;

class Sample {
    private SparseBooleanArray seen = new SparseBooleanArray();
    private SparseIntArray counts;

    void f(int k) {
        counts = new SparseIntArray();
        this.seen.put(k, true);
        counts.put(k, counts.size());
    }
}
",
    );
}

#[test]
fn test_long_keys() {
    assert_rewrites(
        &SparseArray,
        android(),
        "import java.util.HashMap;

class Sample {
    void f() {
        HashMap<Long, Object> cache = new HashMap<Long, Object>(16);
        cache.clear();
    }
}
",
        "import java.util.HashMap;
import android.util.LongSparseArray;

class Sample {
    void f() {
        LongSparseArray<Object> cache = new LongSparseArray<Object>(16);
        cache.clear();
    }
}
",
    );
}

#[test]
fn test_incompatible_uses_are_left_alone() {
    let source = "import java.util.HashMap;

class Sample {
    HashMap<Integer, String> shared = new HashMap<Integer, String>();

    void f(HashMap<Integer, String> other) {
        HashMap<Integer, String> a = other;
        HashMap<Integer, String> b = new HashMap<Integer, String>();
        b.keySet();
        HashMap<Integer, String> c = new HashMap<Integer, String>();
        use(c);
        HashMap<String, String> d = new HashMap<String, String>();
    }
}
";
    assert_unchanged(&SparseArray, android(), source);
    assert_unchanged(&SparseArray, ProjectOptions::default(), source);
}

#[test]
fn test_clashing_import_blocks_the_rewrite() {
    assert_unchanged(
        &SparseArray,
        android(),
        "import java.util.HashMap;
import com.example.SparseArray;

class Sample {
    void f() {
        HashMap<Integer, String> names = new HashMap<Integer, String>();
    }
}
",
    );
}
